use tracing::trace_span;
use tracing_subscriber::{
    EnvFilter, layer::SubscriberExt, util::SubscriberInitExt,
};

use pgrecv::Result;

mod message;
mod decode;
mod from_row;

fn main() -> Result<()> {
    tracing_subscriber::Registry::default()
        .with(EnvFilter::from_default_env())
        .with(tracing_subscriber::fmt::layer().with_target(false))
        .init();

    trace_span!("decode").in_scope(decode::main)?;
    trace_span!("from_row").in_scope(from_row::main)?;

    Ok(())
}
