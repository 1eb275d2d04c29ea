pub mod domain {
    pub mod dates;
    pub mod error;
    pub mod models;
    pub mod repository;
    pub mod user;
}

pub mod data {
    pub mod database;
    pub mod sqlite;
}

pub mod application {
    pub mod course_service;
    pub mod material_service;
    pub mod plan_service;
    pub mod planner;
    pub mod user_service;
}

pub mod infrastructure {
    pub mod config;
    pub mod logging;
}

pub mod presentation {
    pub mod error;
    pub mod handlers;
    pub mod identity;
    pub mod materials;
    pub mod middleware;
    pub mod plans;
    pub mod routes;
}
