pub mod args;
pub mod next_arg;
pub mod serializers;
pub mod units;
