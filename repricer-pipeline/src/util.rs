/// Extract a short type name from the full module path.
///
/// Given `"my_crate::some_module::MyType"`, returns `"MyType"`. Generic
/// arguments are dropped: `"a::Wrapper<b::Inner>"` gives `"Wrapper"`.
pub fn short_type_name(full: &str) -> &str {
    let base = full.split('<').next().unwrap_or(full);
    base.rsplit("::").next().unwrap_or(base)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn strips_module_path() {
        assert_eq!(short_type_name("repricer_pipeline::components::StockFloorFilter"), "StockFloorFilter");
        assert_eq!(short_type_name("Plain"), "Plain");
    }

    #[test]
    fn strips_generic_arguments() {
        assert_eq!(short_type_name("a::Wrapper<b::Inner>"), "Wrapper");
    }
}
