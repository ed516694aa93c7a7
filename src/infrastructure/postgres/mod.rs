pub mod postgres_sink_adapter;
