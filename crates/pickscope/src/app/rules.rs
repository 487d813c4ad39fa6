//! Blocking rule derivation for the current scope target.

use crate::domain::model::{CssSelectorType, NodeId, RuleRequest, RuleType};
use crate::domain::ports::{PageDom, RuleConstructor};

/// Attributes checked, in priority order, for a URL to scope the rule with.
const URL_BLOCK_ATTRIBUTES: [&str; 2] = ["src", "data"];

/// First non-empty URL-bearing attribute of `node`.
pub fn url_block_attribute(dom: &dyn PageDom, node: NodeId) -> Option<String> {
    URL_BLOCK_ATTRIBUTES
        .iter()
        .filter_map(|name| dom.attribute(node, name))
        .find(|value| !value.is_empty())
        .map(str::to_owned)
}

/// Build the rule-construction request for `node` on the page at `location`.
pub fn rule_request(dom: &dyn PageDom, node: NodeId, location: &str) -> RuleRequest {
    RuleRequest {
        url_mask: url_block_attribute(dom, node),
        css_selector_type: CssSelectorType::StrictFull,
        is_block_one_domain: true,
        url: location.to_owned(),
        rule_type: RuleType::Css,
    }
}

/// Derive the blocking rule text for `node`. Deterministic for a given node and location.
pub fn derive_rule(
    dom: &dyn PageDom,
    rules: &dyn RuleConstructor,
    node: NodeId,
    location: &str,
) -> String {
    let request = rule_request(dom, node, location);
    let rule = rules.construct_rule_text(dom, node, &request);
    tracing::debug!(node = %node, rule = %rule, "derived blocking rule");
    rule
}
