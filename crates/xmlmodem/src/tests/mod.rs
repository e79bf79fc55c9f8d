
mod failures;
mod lists;
