// src/main.rs
//! Intercept Engine demo
//!
//! Proxies a small calculator with the configured interceptors and shows how
//! failures turn into default or fallback return values.

use anyhow::Result;
use intercept_engine::interception::{decode_argument, MethodInfo, ReturnType, Target};
use intercept_engine::interceptors::{FallbackInterceptor, TimingInterceptor};
use intercept_engine::observability::{init_metrics, init_tracing};
use intercept_engine::{declare_interceptors, FactoryConfig, InterceptError, ProxyFactory};
use serde_json::{json, Value};
use std::sync::Arc;
use tracing::{error, info};

#[derive(Default)]
struct Calculator;

impl Target for Calculator {
    const TYPE_NAME: &'static str = "Calculator";

    fn methods() -> Vec<MethodInfo> {
        vec![
            MethodInfo::new(Self::TYPE_NAME, "add", ReturnType::Int),
            MethodInfo::new(Self::TYPE_NAME, "divide", ReturnType::Int),
            MethodInfo::new(Self::TYPE_NAME, "sqrt", ReturnType::optional(ReturnType::Float)),
        ]
    }

    fn invoke(&self, method: &MethodInfo, args: &[Value]) -> std::result::Result<Value, InterceptError> {
        match method.name {
            "add" => {
                let a: i64 = decode_argument(args, 0, method)?;
                let b: i64 = decode_argument(args, 1, method)?;
                a.checked_add(b)
                    .map(|sum| json!(sum))
                    .ok_or_else(|| InterceptError::call(method.qualified_name(), "overflow"))
            }
            "divide" => {
                let a: i64 = decode_argument(args, 0, method)?;
                let b: i64 = decode_argument(args, 1, method)?;
                if b == 0 {
                    return Err(InterceptError::call(method.qualified_name(), "division by zero"));
                }
                a.checked_div(b)
                    .map(|q| json!(q))
                    .ok_or_else(|| InterceptError::call(method.qualified_name(), "overflow"))
            }
            "sqrt" => {
                let x: f64 = decode_argument(args, 0, method)?;
                if x < 0.0 {
                    return Err(InterceptError::call(method.qualified_name(), "negative input"));
                }
                Ok(json!(x.sqrt()))
            }
            other => Err(InterceptError::call(
                method.qualified_name(),
                format!("unhandled method {}", other),
            )),
        }
    }
}

declare_interceptors!(Calculator => ["logging"]);

fn main() -> Result<()> {
    // Load configuration
    let config = FactoryConfig::load()?;

    // Initialize observability (tracing, metrics)
    init_tracing(&config.logging)?;
    let metrics = init_metrics()?;

    info!("Starting Intercept Engine demo v{}", env!("CARGO_PKG_VERSION"));

    let factory = ProxyFactory::from_config(&config);
    let timing = Arc::new(TimingInterceptor::new());

    let calculator = factory.create_proxy::<Calculator>(
        vec![
            timing.clone(),
            Arc::new(FallbackInterceptor::new(json!(-1)).for_method("divide")),
        ],
        None,
    )?;
    info!("Interceptors: {:?}", calculator.interceptors());

    let calls = [
        ("add", vec![json!(2), json!(3)]),
        ("divide", vec![json!(10), json!(2)]),
        ("divide", vec![json!(10), json!(0)]),
        ("sqrt", vec![json!(-4.0)]),
    ];

    for (method, args) in calls {
        let shown = format!("{}({:?})", method, args);
        match calculator.call(method, args) {
            Ok(value) => info!("{} = {}", shown, value),
            Err(e) => error!("{} raised {}", shown, e),
        }
    }

    let stats = timing.stats();
    info!(
        "Timed {} calls ({} failed), avg {}ns",
        stats.calls,
        stats.failures,
        stats.avg_time_ns()
    );
    println!("{}", metrics.render());

    Ok(())
}
