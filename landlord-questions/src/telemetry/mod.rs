pub mod audit_dump;
