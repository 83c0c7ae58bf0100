// Domain model: template parsing and evaluation

pub mod template;
