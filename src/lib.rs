pub mod shared {
    pub mod core {
        pub mod money;
        pub mod primitives;
    }
}

pub mod modules {
    pub mod reservations {
        pub mod core {
            pub mod availability;
            pub mod catalog;
            pub mod errors;
            pub mod payment;
            pub mod payments {
                pub mod methods;
                pub mod registry;
            }
            pub mod ports;
            pub mod pricing;
            pub mod rates;
            pub mod reservation;
            pub mod role;
            pub mod stock;
        }
        pub mod application {
            pub mod availability_calendar;
            pub mod errors;
            pub mod pricing_engine;
            pub mod rate_resolver;
        }
        pub mod use_cases {
            pub mod check_availability {
                pub mod command;
                pub mod handler;
                pub mod inbound {
                    pub mod http;
                }
            }
            pub mod price_reservation {
                pub mod command;
                pub mod handler;
                pub mod inbound {
                    pub mod http;
                }
            }
            pub mod create_pending_reservation {
                pub mod command;
                pub mod decide;
                pub mod handler;
                pub mod inbound {
                    pub mod http;
                }
            }
            pub mod pay_for_reservation {
                pub mod command;
                pub mod handler;
                pub mod inbound {
                    pub mod http;
                }
            }
            pub mod confirm_reservation {
                pub mod decide;
                pub mod handler;
                pub mod inbound {
                    pub mod http;
                }
            }
            pub mod cancel_reservation {
                pub mod handler;
                pub mod inbound {
                    pub mod http;
                }
            }
            pub mod expire_stale_reservations {
                pub mod handler;
            }
        }
        pub mod adapters {
            pub mod inbound {
                pub mod http_error;
            }
            pub mod outbound {
                pub mod in_memory_store;
                pub mod simulated_gateway;
            }
        }
    }
}

pub mod shell;
