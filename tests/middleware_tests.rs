mod common;

use std::sync::{Arc, Mutex};

use common::TestTransport;
use http::Method;
use trellis::middleware::{
    compose, handler_fn, middleware_fn, AccessLogBuilder, ErrorMapBuilder, Handler, Middleware,
    RecoveryBuilder, TracingBuilder,
};
use trellis::{Context, ParsedRequest};

fn tagging(events: Arc<Mutex<Vec<String>>>, name: &'static str) -> Middleware {
    middleware_fn(move |next: Handler| {
        let events = Arc::clone(&events);
        Arc::new(move |ctx: &mut Context<'_>| {
            events.lock().unwrap().push(format!("{name}:before"));
            next(ctx);
            events.lock().unwrap().push(format!("{name}:after"));
        })
    })
}

#[test]
fn first_registered_middleware_is_outermost() {
    let events = Arc::new(Mutex::new(Vec::new()));
    let chain = vec![
        tagging(Arc::clone(&events), "first"),
        tagging(Arc::clone(&events), "second"),
        tagging(Arc::clone(&events), "third"),
    ];
    let terminal = {
        let events = Arc::clone(&events);
        handler_fn(move |_ctx| events.lock().unwrap().push("handler".to_string()))
    };

    let pipeline = compose(&chain, terminal);
    let mut transport = TestTransport::default();
    let mut ctx = Context::new(ParsedRequest::new(Method::GET, "/"), None, &mut transport);
    pipeline(&mut ctx);

    assert_eq!(
        *events.lock().unwrap(),
        vec![
            "first:before",
            "second:before",
            "third:before",
            "handler",
            "third:after",
            "second:after",
            "first:after",
        ]
    );
}

#[test]
fn short_circuit_skips_handler_and_inner_middleware() {
    let events = Arc::new(Mutex::new(Vec::new()));
    let reject: Middleware = middleware_fn(|_next: Handler| {
        handler_fn(|ctx| {
            ctx.set_status(401);
            ctx.set_body("denied");
        })
    });
    let chain = vec![reject, tagging(Arc::clone(&events), "inner")];
    let terminal = {
        let events = Arc::clone(&events);
        handler_fn(move |_ctx| events.lock().unwrap().push("handler".to_string()))
    };

    let pipeline = compose(&chain, terminal);
    let mut transport = TestTransport::default();
    let mut ctx = Context::new(ParsedRequest::new(Method::GET, "/"), None, &mut transport);
    pipeline(&mut ctx);

    assert_eq!(ctx.response_status(), 401);
    assert_eq!(ctx.response_body(), b"denied");
    assert!(events.lock().unwrap().is_empty());
}

#[test]
fn error_map_rewrites_mapped_status_bodies() {
    let remap = ErrorMapBuilder::new()
        .add_code(404, "nothing here")
        .add_code(500, "try later")
        .build();
    let terminal = handler_fn(|ctx| {
        ctx.set_status(404);
        ctx.set_body("original");
    });

    let pipeline = compose(&[remap], terminal);
    let mut transport = TestTransport::default();
    let mut ctx = Context::new(ParsedRequest::new(Method::GET, "/"), None, &mut transport);
    pipeline(&mut ctx);

    assert_eq!(ctx.response_status(), 404);
    assert_eq!(ctx.response_body(), b"nothing here");
}

#[test]
fn error_map_leaves_unmapped_statuses_alone() {
    let remap = ErrorMapBuilder::new().add_code(404, "nothing here").build();
    let terminal = handler_fn(|ctx| {
        ctx.set_status(200);
        ctx.set_body("fine");
    });

    let pipeline = compose(&[remap], terminal);
    let mut transport = TestTransport::default();
    let mut ctx = Context::new(ParsedRequest::new(Method::GET, "/"), None, &mut transport);
    pipeline(&mut ctx);

    assert_eq!(ctx.response_body(), b"fine");
}

#[test]
fn access_log_emits_one_json_line_after_handler() {
    let lines = Arc::new(Mutex::new(Vec::new()));
    let sink = Arc::clone(&lines);
    let access = AccessLogBuilder::new()
        .log_fn(move |line| sink.lock().unwrap().push(line.to_string()))
        .build();
    let terminal = handler_fn(|ctx| ctx.set_status(200));

    let pipeline = compose(&[access], terminal);
    let mut transport = TestTransport::default();
    let mut parsed = ParsedRequest::new(Method::GET, "/pets/1");
    parsed
        .headers
        .insert("host".to_string(), "example.test".to_string());
    let mut ctx = Context::new(parsed, None, &mut transport);
    ctx.matched_route = Some(Arc::from("/pets/:id"));
    pipeline(&mut ctx);

    let lines = lines.lock().unwrap();
    assert_eq!(lines.len(), 1);
    let entry: serde_json::Value = serde_json::from_str(&lines[0]).unwrap();
    assert_eq!(entry["http_method"], "GET");
    assert_eq!(entry["path"], "/pets/1");
    assert_eq!(entry["route"], "/pets/:id");
    assert_eq!(entry["host"], "example.test");
}

#[test]
fn tracing_span_does_not_disturb_the_response() {
    common::init_tracing();
    let tracing_mw = TracingBuilder::new().build();
    let terminal = handler_fn(|ctx| {
        ctx.set_status(204);
    });

    let pipeline = compose(&[tracing_mw], terminal);
    let mut transport = TestTransport::default();
    let mut ctx = Context::new(ParsedRequest::new(Method::GET, "/traced"), None, &mut transport);
    ctx.matched_route = Some(Arc::from("/traced"));
    pipeline(&mut ctx);

    assert_eq!(ctx.response_status(), 204);
}

#[test]
fn recovery_catches_panic_and_buffers_fallback() {
    let faults = Arc::new(Mutex::new(0usize));
    let observed = Arc::clone(&faults);
    let recovery = RecoveryBuilder::new()
        .observe(move |_ctx| *observed.lock().unwrap() += 1)
        .build();
    let terminal = handler_fn(|_ctx| panic!("boom"));

    let pipeline = compose(&[recovery], terminal);
    let mut transport = TestTransport::default();
    let mut ctx = Context::new(ParsedRequest::new(Method::GET, "/"), None, &mut transport);
    pipeline(&mut ctx);

    assert_eq!(ctx.response_status(), 500);
    assert_eq!(ctx.response_body(), b"internal error");
    assert_eq!(*faults.lock().unwrap(), 1);
}

#[test]
fn recovery_fallback_is_configurable() {
    let recovery = RecoveryBuilder::new()
        .status_code(503)
        .body("temporarily down")
        .build();
    let terminal = handler_fn(|_ctx| panic!("boom"));

    let pipeline = compose(&[recovery], terminal);
    let mut transport = TestTransport::default();
    let mut ctx = Context::new(ParsedRequest::new(Method::GET, "/"), None, &mut transport);
    pipeline(&mut ctx);

    assert_eq!(ctx.response_status(), 503);
    assert_eq!(ctx.response_body(), b"temporarily down");
}

#[test]
fn recovery_passes_through_clean_requests() {
    let faults = Arc::new(Mutex::new(0usize));
    let observed = Arc::clone(&faults);
    let recovery = RecoveryBuilder::new()
        .observe(move |_ctx| *observed.lock().unwrap() += 1)
        .build();
    let terminal = handler_fn(|ctx| {
        ctx.set_status(201);
        ctx.set_body("made");
    });

    let pipeline = compose(&[recovery], terminal);
    let mut transport = TestTransport::default();
    let mut ctx = Context::new(ParsedRequest::new(Method::POST, "/"), None, &mut transport);
    pipeline(&mut ctx);

    assert_eq!(ctx.response_status(), 201);
    assert_eq!(ctx.response_body(), b"made");
    assert_eq!(*faults.lock().unwrap(), 0);
}
