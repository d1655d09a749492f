//! JSON:API demo binary.
//!
//! Marshals a sample blog graph to stdout. Pass `many` to marshal two blogs
//! as a collection. Output layout follows `JSONAPI_PRETTY` and
//! `JSONAPI_INDENT`.

mod models;

use std::io::{self, Write};

use jsonapi_application::DescriptorRegistry;
use jsonapi_domain::ApiExtras;
use jsonapi_infrastructure::{DocumentWriter, EncoderConfig};
use tracing_subscriber::{EnvFilter, layer::SubscriberExt, util::SubscriberInitExt};

const API_ROOT: &str = "https://localhost:8080/api/v1";

fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Logs go to stderr so stdout carries only the document
    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .with(tracing_subscriber::fmt::layer().with_writer(io::stderr))
        .init();

    let config = EncoderConfig::from_env();
    tracing::info!(
        pretty = config.pretty,
        "Starting JSON:API demo v{}",
        env!("CARGO_PKG_VERSION")
    );

    let newline = !config.trailing_newline;
    let many = std::env::args().nth(1).is_some_and(|arg| arg == "many");
    let writer = DocumentWriter::new(DescriptorRegistry::global(), config);

    let mut extras = ApiExtras::new();
    extras
        .add_root_link("self", format!("{API_ROOT}/blogs"))
        .add_relationship_link(
            "related",
            "posts",
            "posts",
            "blogs",
            format!("{API_ROOT}/blogs/posts?blog_id={{blogs.id}}"),
        )
        .add_relationship_link(
            "related",
            "comments",
            "comments",
            "posts",
            format!("{API_ROOT}/posts/{{posts.id}}/comments"),
        );

    let stdout = io::stdout();
    let mut out = stdout.lock();
    if many {
        let first = models::sample_blog(1);
        let second = models::sample_blog(2);
        writer.write_many(&mut out, &[&first, &second], &extras)?;
    } else {
        writer.write_one(&mut out, &models::sample_blog(5), &extras)?;
    }
    if newline {
        writeln!(out)?;
    }

    tracing::info!(
        descriptors = DescriptorRegistry::global().len(),
        "document written"
    );
    Ok(())
}
