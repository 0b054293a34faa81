use pest_derive::Parser;

#[derive(Parser)]
#[grammar = "as7.pest"]
pub struct As7Parser;
