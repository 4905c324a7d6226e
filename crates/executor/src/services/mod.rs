pub mod report;
pub mod scan_service;
