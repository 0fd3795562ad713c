/// Strip the module path from a `std::any::type_name` result so stage names
/// stay short in log lines, e.g. `"giftpair_pipeline::x::SynergyScorer"`
/// becomes `"SynergyScorer"`.
pub fn short_type_name(full: &str) -> &str {
    full.rsplit("::").next().unwrap_or(full)
}
