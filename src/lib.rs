pub mod config;
pub mod domain {
    pub mod course;
    pub mod payment;
    pub mod transitions;
}
pub mod gateways;
pub mod http {
    pub mod extract;
    pub mod handlers {
        pub mod payments;
        pub mod webhook;
    }
    pub mod middleware {
        pub mod admin_auth;
    }
}
pub mod repo;
pub mod service {
    pub mod enrollment_service;
}
pub mod webhook {
    pub mod event;
    pub mod signature;
}

#[derive(Clone)]
pub struct AppState {
    pub enrollment_service: service::enrollment_service::EnrollmentService,
    pub payments_repo: repo::payments_repo::PaymentsRepo,
    pub webhook_signing_secret: String,
    pub webhook_tolerance_seconds: i64,
}
