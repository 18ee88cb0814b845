pub mod event_queries;
