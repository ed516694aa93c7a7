pub mod mongo;
pub mod postgres;
