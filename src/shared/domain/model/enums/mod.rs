pub mod shared_domain_error;
