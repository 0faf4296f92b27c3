//! Tests for the tool module.

use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};

use llm_director_core::{FunctionCall, ParamType, ToolSignature};
use serde_json::json;

use super::*;

fn call(expr: &str) -> FunctionCall {
    expr.parse().unwrap()
}

fn add_sig() -> ToolSignature {
    ToolSignature::new("add", "Add two integers")
        .param("a", ParamType::Integer)
        .param("b", ParamType::Integer)
}

/// A struct-based handler, as a tool with state would be written.
struct AddTool;

impl ToolHandler<()> for AddTool {
    fn signature(&self) -> ToolSignature {
        add_sig()
    }

    fn execute<'a>(&'a self, args: ToolArgs, _ctx: &'a ()) -> ToolFuture<'a> {
        Box::pin(async move { Ok::<_, ToolError>(ToolOutput::from(args.i64(0)? + args.i64(1)?)) })
    }
}

/// Counts executions so tests can check a call was not repeated.
struct CountingTool {
    runs: Arc<AtomicUsize>,
}

impl ToolHandler<()> for CountingTool {
    fn signature(&self) -> ToolSignature {
        ToolSignature::new("tick", "Count").param("n", ParamType::Integer)
    }

    fn execute<'a>(&'a self, args: ToolArgs, _ctx: &'a ()) -> ToolFuture<'a> {
        Box::pin(async move {
            let total = self.runs.fetch_add(1, Ordering::SeqCst) + 1;
            Ok::<_, ToolError>(ToolOutput::new(format!("{}:{total}", args.i64(0)?)))
        })
    }
}

fn math_registry() -> ToolRegistry {
    let mut registry = ToolRegistry::new();
    registry
        .register(AddTool)
        .register(tool_fn(
            ToolSignature::new("mul", "Multiply")
                .param("a", ParamType::Integer)
                .param("b", ParamType::Integer),
            |args| async move { Ok::<_, ToolError>(args.i64(0)? * args.i64(1)?) },
        ))
        .register(tool_fn(
            ToolSignature::new("sum", "Sum integers").vararg("xs", ParamType::Integer),
            |args| async move { Ok::<_, ToolError>(args.i64_list(0)?.iter().sum::<i64>()) },
        ))
        .register(tool_fn(
            ToolSignature::new("mean", "Mean of numbers")
                .param("xs", ParamType::array(ParamType::Float)),
            |args| async move {
                let xs = args.f64_list(0)?;
                if xs.is_empty() {
                    return Err(ToolError::new("mean of nothing"));
                }
                #[allow(clippy::cast_precision_loss)]
                let count = xs.len() as f64;
                Ok(xs.iter().sum::<f64>() / count)
            },
        ))
        .register(tool_fn(
            ToolSignature::new("range", "Integers from a to b")
                .param("a", ParamType::Integer)
                .param("b", ParamType::Integer),
            |args| async move {
                let (a, b) = (args.i64(0)?, args.i64(1)?);
                Ok::<_, ToolError>(json!((a..=b).collect::<Vec<_>>()))
            },
        ))
        .register(tool_fn(
            ToolSignature::new("id", "Identity").param("x", ParamType::Integer),
            |args| async move { Ok::<_, ToolError>(args.i64(0)?) },
        ))
        .register(tool_fn(
            ToolSignature::new("greet", "Greet")
                .param("name", ParamType::String)
                .param("initial", ParamType::Char)
                .param("loud", ParamType::Boolean),
            |args| async move {
                let text = format!("hi {} ({})", args.str(0)?, args.str(1)?);
                Ok::<_, ToolError>(if args.bool(2)? { text.to_uppercase() } else { text })
            },
        ));
    registry
}

// ── ToolHandler tests ───────────────────────────────────────────

#[tokio::test]
async fn test_tool_fn_executes() {
    let handler = tool_fn(
        ToolSignature::new("hello", "Say hello"),
        |_args| async { Ok::<_, ToolError>("Hello!") },
    );
    let out = ToolHandler::<()>::execute(&handler, ToolArgs::default(), &())
        .await
        .unwrap();
    assert_eq!(out.content, "Hello!");
    assert_eq!(ToolHandler::<()>::signature(&handler).name, "hello");
}

#[tokio::test]
async fn test_struct_handler_reports_missing_argument() {
    let err = AddTool
        .execute(ToolArgs::new(vec![json!(1)]), &())
        .await
        .unwrap_err();
    assert_eq!(err.message, "missing argument 1");
}

#[tokio::test]
async fn test_tool_fn_with_ctx() {
    struct Prefix(String);

    let mut registry: ToolRegistry<Prefix> = ToolRegistry::new();
    registry.register(tool_fn_with_ctx(
        ToolSignature::new("tag", "Tag text").param("s", ParamType::String),
        |args: ToolArgs, ctx: &Prefix| {
            let tagged = args.str(0).map(|s| format!("{}{s}", ctx.0));
            async move { tagged }
        },
    ));

    let ctx = Prefix("#".into());
    let result = registry.evaluate(&call("tag(\"rust\")"), &ctx).await.unwrap();
    assert_eq!(result, "#rust");
}

#[tokio::test]
async fn test_tool_fn_blocking() {
    let mut registry: ToolRegistry = ToolRegistry::new();
    registry.register(tool_fn_blocking(
        ToolSignature::new("fib", "Fibonacci").param("n", ParamType::Integer),
        |args| {
            let n = args.i64(0)?;
            let (mut a, mut b) = (0_i64, 1_i64);
            for _ in 0..n {
                (a, b) = (b, a + b);
            }
            Ok(a)
        },
    ));
    assert_eq!(registry.evaluate(&call("fib(10)"), &()).await.unwrap(), "55");
}

#[test]
fn test_handler_debug_shows_name() {
    let handler = tool_fn(add_sig(), |_args| async { Ok::<_, ToolError>(0_i64) });
    assert!(format!("{handler:?}").contains("add"));
}

// ── ToolOutput / ToolArgs tests ─────────────────────────────────

#[test]
fn test_output_from_values() {
    assert_eq!(ToolOutput::from(json!("text")).content, "text");
    assert_eq!(ToolOutput::from(json!({"a": 1})).content, "{\"a\":1}");
    assert_eq!(ToolOutput::from(2.5).content, "2.5");
    assert_eq!(ToolOutput::from(true).content, "true");
}

#[test]
fn test_args_type_mismatch() {
    let args = ToolArgs::new(vec![json!("x"), json!([1, "y"])]);
    assert!(args.i64(0).unwrap_err().message.contains("expected an integer"));
    assert_eq!(args.str(0).unwrap(), "x");
    assert!(args.i64_list(1).is_err());
    assert_eq!(args.list(1).unwrap().len(), 2);
    assert!(args.get(2).is_none());
}

// ── ToolRegistry tests ──────────────────────────────────────────

#[test]
fn test_registry_lookup() {
    let registry = math_registry();
    assert!(registry.contains("add"));
    assert!(registry.get("add").is_some());
    assert_eq!(registry.lookup("add"), Some(&add_sig()));
    assert!(registry.lookup("nope").is_none());
    assert!(!registry.is_empty());
}

#[test]
fn test_registry_resolve_unknown() {
    let registry = math_registry();
    let err = registry.resolve(&call("nope(1)")).unwrap_err();
    assert_eq!(
        err,
        InvokeError::Unresolved {
            name: "nope".into()
        }
    );
    assert_eq!(registry.resolve(&call("add(1, 2)")).unwrap().name, "add");
}

#[test]
fn test_registry_signatures_sorted() {
    let registry = math_registry();
    let names: Vec<_> = registry.signatures().into_iter().map(|s| s.name).collect();
    assert_eq!(names, vec!["add", "greet", "id", "mean", "mul", "range", "sum"]);
    assert_eq!(registry.names().first(), Some(&"add"));
}

#[test]
fn test_registry_replace_same_name() {
    let mut registry: ToolRegistry = ToolRegistry::new();
    registry.register(AddTool);
    registry.register(tool_fn(
        ToolSignature::new("add", "Replaced"),
        |_args| async { Ok::<_, ToolError>("x") },
    ));
    assert_eq!(registry.len(), 1);
    assert_eq!(registry.lookup("add").unwrap().description, "Replaced");
}

#[test]
fn test_registry_without_and_only() {
    let registry = math_registry();
    let fewer = registry.without(["add", "mul"]);
    assert!(!fewer.contains("add"));
    assert!(fewer.contains("sum"));
    assert_eq!(fewer.len(), registry.len() - 2);

    let just = registry.only(["add", "missing"]);
    assert_eq!(just.len(), 1);
    assert!(just.contains("add"));
}

#[test]
fn test_registry_debug_lists_names() {
    let debug = format!("{:?}", math_registry());
    assert!(debug.contains("\"add\""));
}

// ── Invocation tests ────────────────────────────────────────────

#[tokio::test]
async fn test_invoke_success_records_history() {
    let registry = math_registry();
    let mut history = CallHistory::new();
    let status = registry.invoke(&call("add(2, 3)"), &mut history, &()).await;
    assert_eq!(
        status,
        CallStatus::Success {
            key: "add(2, 3)".into(),
            result: "5".into()
        }
    );
    assert_eq!(history.get("add(2, 3)"), Some("5"));
}

#[tokio::test]
async fn test_invoke_repeat_is_recalled_without_running() {
    let runs = Arc::new(AtomicUsize::new(0));
    let mut registry: ToolRegistry = ToolRegistry::new();
    registry.register(CountingTool {
        runs: Arc::clone(&runs),
    });
    let mut history = CallHistory::new();

    let first = registry.invoke(&call("tick(7)"), &mut history, &()).await;
    assert!(first.is_success());
    let second = registry.invoke(&call("tick(7)"), &mut history, &()).await;
    assert_eq!(
        second,
        CallStatus::Recalled {
            key: "tick(7)".into(),
            previous: "7:1".into()
        }
    );
    assert_eq!(runs.load(Ordering::SeqCst), 1);

    // A different argument is a different call.
    let third = registry.invoke(&call("tick(8)"), &mut history, &()).await;
    assert!(third.is_success());
    assert_eq!(runs.load(Ordering::SeqCst), 2);
}

#[tokio::test]
async fn test_equivalent_spellings_share_a_key() {
    let registry = math_registry();
    let mut history = CallHistory::new();
    registry.invoke(&call("add(2, 3)"), &mut history, &()).await;
    let status = registry
        .invoke(&call("add( 2 ,\"3\")"), &mut history, &())
        .await;
    assert!(matches!(status, CallStatus::Recalled { ref key, .. } if key == "add(2, 3)"));
}

#[tokio::test]
async fn test_invoke_unresolved() {
    let registry = math_registry();
    let mut history = CallHistory::new();
    let status = registry.invoke(&call("pow(2, 3)"), &mut history, &()).await;
    assert!(matches!(status, CallStatus::Error(ref e) if e.is_unresolved()));
    assert!(history.is_empty());
}

#[tokio::test]
async fn test_invoke_arity_mismatch() {
    let registry = math_registry();
    let err = registry.evaluate(&call("add(1)"), &()).await.unwrap_err();
    assert_eq!(
        err,
        InvokeError::Arity {
            name: "add".into(),
            expected: "2".into(),
            found: 1
        }
    );
}

#[tokio::test]
async fn test_invoke_coercion_failure() {
    let registry = math_registry();
    let err = registry.evaluate(&call("add(1, \"two\")"), &()).await.unwrap_err();
    let InvokeError::Coercion(inner) = err else {
        panic!("expected coercion error, got {err:?}");
    };
    assert_eq!(inner.param, "b");
    assert_eq!(inner.expected, ParamType::Integer);
}

#[tokio::test]
async fn test_tool_failure_is_not_recorded() {
    let registry = math_registry();
    let mut history = CallHistory::new();
    let status = registry.invoke(&call("mean([])"), &mut history, &()).await;
    let CallStatus::Error(InvokeError::Tool { name, source }) = status else {
        panic!("expected tool error, got {status:?}");
    };
    assert_eq!(name, "mean");
    assert_eq!(source.message, "mean of nothing");
    assert!(history.is_empty());
}

#[tokio::test]
async fn test_mixed_scalar_types() {
    let registry = math_registry();
    let result = registry
        .evaluate(&call("greet(\"ada lovelace\", 'A', TRUE)"), &())
        .await
        .unwrap();
    assert_eq!(result, "HI ADA LOVELACE (A)");
}

// ── Nested call tests ───────────────────────────────────────────

#[tokio::test]
async fn test_nested_calls_evaluate_inside_out() {
    let registry = math_registry();
    let mut history = CallHistory::new();
    let status = registry
        .invoke(&call("add(mul(2, 3), add(1, 1))"), &mut history, &())
        .await;
    assert_eq!(
        status,
        CallStatus::Success {
            key: "add(6, 2)".into(),
            result: "8".into()
        }
    );
    // Only the outermost call is recorded.
    assert_eq!(history.len(), 1);
    assert!(!history.contains("mul(2, 3)"));
}

#[tokio::test]
async fn test_nested_call_matches_literal_key() {
    let registry = math_registry();
    let mut history = CallHistory::new();
    registry.invoke(&call("add(6, 2)"), &mut history, &()).await;
    let status = registry
        .invoke(&call("add(mul(2, 3), 2)"), &mut history, &())
        .await;
    assert!(matches!(status, CallStatus::Recalled { .. }));
}

#[tokio::test]
async fn test_nested_unknown_function() {
    let registry = math_registry();
    let err = registry
        .evaluate(&call("add(pow(2, 3), 1)"), &())
        .await
        .unwrap_err();
    assert_eq!(err, InvokeError::Unresolved { name: "pow".into() });
}

#[tokio::test]
async fn test_nested_error_propagates() {
    let registry = math_registry();
    let err = registry
        .evaluate(&call("add(mean([]), 1)"), &())
        .await
        .unwrap_err();
    assert!(matches!(err, InvokeError::Tool { ref name, .. } if name == "mean"));
}

fn nested_ids(levels: usize) -> String {
    format!("{}1{}", "id(".repeat(levels), ")".repeat(levels))
}

#[tokio::test]
async fn test_nesting_limit() {
    let registry = math_registry();
    let ok = registry.evaluate(&call(&nested_ids(MAX_NESTING)), &()).await;
    assert_eq!(ok.unwrap(), "1");

    let err = registry
        .evaluate(&call(&nested_ids(MAX_NESTING + 1)), &())
        .await
        .unwrap_err();
    assert_eq!(err, InvokeError::NestingTooDeep { limit: MAX_NESTING });
}

// ── Vararg and array tests ──────────────────────────────────────

#[tokio::test]
async fn test_vararg_binding() {
    let registry = math_registry();
    let eval = |expr: &'static str| {
        let registry = registry.clone();
        async move { registry.evaluate(&call(expr), &()).await }
    };
    assert_eq!(eval("sum(1, 2, 3)").await.unwrap(), "6");
    assert_eq!(eval("sum()").await.unwrap(), "0");
    assert_eq!(eval("sum(4)").await.unwrap(), "4");
    assert_eq!(eval("sum([1, 2, 3])").await.unwrap(), "6");
    assert_eq!(eval("sum(listOf(1, 2, 3))").await.unwrap(), "6");
    assert_eq!(eval("sum(range(1, 4))").await.unwrap(), "10");
    assert_eq!(eval("sum(add(1, 1), 3)").await.unwrap(), "5");
}

#[tokio::test]
async fn test_vararg_key_is_canonical() {
    let registry = math_registry();
    let mut history = CallHistory::new();
    registry.invoke(&call("sum(1, 2)"), &mut history, &()).await;
    let status = registry.invoke(&call("sum([1, 2])"), &mut history, &()).await;
    assert!(matches!(status, CallStatus::Recalled { ref key, .. } if key == "sum([1,2])"));
}

#[tokio::test]
async fn test_array_parameter_forms() {
    let registry = math_registry();
    for expr in [
        "mean([1, 2, 3])",
        "mean(arrayOf(1, 2, 3))",
        "mean(range(1, 3))",
    ] {
        assert_eq!(registry.evaluate(&call(expr), &()).await.unwrap(), "2", "{expr}");
    }
}

#[tokio::test]
async fn test_quoted_text_is_a_single_element() {
    let mut registry: ToolRegistry = ToolRegistry::new();
    registry.register(tool_fn(
        ToolSignature::new("tags", "Count tags").param("xs", ParamType::array(ParamType::String)),
        |args| async move { Ok::<_, ToolError>(json!(args.list(0)?)) },
    ));
    let result = registry.evaluate(&call("tags(\"a, b\")"), &()).await.unwrap();
    assert_eq!(result, r#"["a, b"]"#);
    let result = registry.evaluate(&call("tags([\"a, b\", c])"), &()).await.unwrap();
    assert_eq!(result, r#"["a, b","c"]"#);

    // Quoted numbers are one element too, so they no longer read as a list.
    let err = math_registry()
        .evaluate(&call("mean(\"1, 2, 3\")"), &())
        .await
        .unwrap_err();
    assert!(matches!(err, InvokeError::Coercion(_)));
}

#[tokio::test]
async fn test_deeply_bracketed_argument_is_an_error() {
    let registry = math_registry();
    let mut history = CallHistory::new();
    let deep = format!("{}{}", "[".repeat(20_000), "]".repeat(20_000));
    for name in ["greet", "mean", "sum", "add"] {
        let args = match name {
            "greet" => vec![deep.clone(), "'a'".into(), "true".into()],
            "add" => vec![deep.clone(), "1".into()],
            _ => vec![deep.clone()],
        };
        let status = registry
            .invoke(&FunctionCall::new(name, args), &mut history, &())
            .await;
        assert!(matches!(status, CallStatus::Error(_)), "{name}: {status:?}");
    }
    assert!(history.is_empty());
}

#[tokio::test]
async fn test_array_constructor_requires_list_parameter() {
    let registry = math_registry();
    let err = registry
        .evaluate(&call("add(listOf(1), 2)"), &())
        .await
        .unwrap_err();
    assert!(err.is_unresolved());
}
