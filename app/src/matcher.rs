use lb_cleaner_services::{
    ListenData,
    Rendered,
};
use regex::{
    Regex,
    RegexBuilder,
};


/// Case-insensitive search over the rendered form of a listen
#[derive(Debug, Clone)]
pub(crate) struct Matcher(Regex);

impl Matcher {
    pub fn new(pattern: &str) -> Result<Self, regex::Error> {
        RegexBuilder::new(pattern).case_insensitive(true).build().map(Self)
    }

    pub fn is_match<L: ListenData + ?Sized>(&self, listen: &L) -> bool { self.0.is_match(&Rendered(listen).to_string()) }
}
