pub mod check_in_queries;
