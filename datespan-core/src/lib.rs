pub mod config;
pub mod expression;
pub mod extract;
pub mod keywords;
pub mod parse_input;
pub mod render;
pub mod resolver;

pub use config::Config;
pub use expression::{ExpressionKind, ResolveError, Resolver, TemporalExpression};
pub use extract::{DateRange, extract, extract_with};
pub use resolver::TextResolver;
