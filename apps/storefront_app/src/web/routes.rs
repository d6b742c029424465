// apps/storefront_app/src/web/routes.rs

use actix_web::web;

use super::handlers::{cart_handlers, delivery_handlers, health_handlers, order_handlers};

pub fn configure_app_routes(cfg: &mut web::ServiceConfig) {
  cfg
    .route("/", web::get().to(health_handlers::root_handler))
    .route("/health", web::get().to(health_handlers::health_check_handler))
    // Cart
    .service(
      web::scope("/cart")
        .route("", web::get().to(cart_handlers::list_cart_handler))
        .route("/add", web::post().to(cart_handlers::add_to_cart_handler))
        .route("/remove", web::post().to(cart_handlers::remove_from_cart_handler)),
    )
    // Orders and delivery
    .route("/orders", web::get().to(order_handlers::list_orders_handler))
    .service(
      web::scope("/order")
        .route("/create", web::post().to(order_handlers::create_order_handler))
        .route("/{order_id}/status", web::get().to(delivery_handlers::get_status_handler))
        .route(
          "/{order_id}/update-status",
          web::post().to(delivery_handlers::update_status_handler),
        ),
    );
}
