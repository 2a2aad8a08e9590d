//! Orders is a service responsible for pricing, sealing and verifying
//! storefront orders. This crate runs the service from `orders_lib`. See
//! `orders_lib` for details.

extern crate env_logger;
#[macro_use]
extern crate log;
extern crate orders_lib;

fn main() {
    env_logger::init();

    let config = orders_lib::config::Config::new().expect("Can't load app config!");
    let service =
        orders_lib::services::Service::create_from_config(&config).expect("Can't create the order service!");

    // The transport in front of the service lives elsewhere; this entry point
    // wires config to the service and reports readiness.
    info!(
        "Order service is up: {} worker threads, sealing orders {}",
        config.service.thread_count,
        if service.signing.is_some() { "with signatures" } else { "hash-only" }
    );
}
