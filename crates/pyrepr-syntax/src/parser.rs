use pest_derive::Parser;

#[derive(Parser)]
#[grammar = "grammar/pyrepr.pest"]
pub struct ReprParser;
