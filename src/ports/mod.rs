pub mod sink_port;
pub mod source_port;
