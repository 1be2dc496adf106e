//! HTTP surface smoke tests.

use actix_web::{test, web, App};
use backend::config::GameConfig;
use backend::middleware::request_trace::RequestTrace;
use backend::state::app_state::AppState;

#[actix_web::test]
async fn health_endpoint_answers_ok_with_a_trace_id() {
    backend_test_support::logging::init();

    let data = web::Data::new(AppState::new(GameConfig::default()));
    let app = test::init_service(
        App::new()
            .wrap(RequestTrace)
            .app_data(data)
            .configure(backend::routes::configure),
    )
    .await;

    let req = test::TestRequest::get().uri("/health").to_request();
    let res = test::call_service(&app, req).await;

    assert!(res.status().is_success());
    assert!(res.headers().contains_key("x-trace-id"));
    let body = test::read_body(res).await;
    assert_eq!(&body[..], b"ok");
}
