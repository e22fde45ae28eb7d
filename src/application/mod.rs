pub mod sale_service;
