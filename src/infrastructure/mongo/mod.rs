pub mod mongo_source_adapter;
