pub mod config;

pub mod domain {
    pub mod error;
    pub mod store;

    pub mod model {
        pub mod book;
        pub mod borrow;
        pub mod id;
    }
}

pub mod application {
    pub mod catalog;
    pub mod detail;
    pub mod error;
    pub mod ledger;
    pub mod service;
}

pub mod infra {
    pub mod json_store;
}

pub mod interface {
    pub mod mcp;
    pub mod render;
}
