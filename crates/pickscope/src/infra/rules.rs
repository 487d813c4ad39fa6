//! Reference rule constructor producing strict element-hiding selectors.

use url::Url;

use crate::domain::model::{NodeId, RuleRequest, RuleType};
use crate::domain::ports::{PageDom, RuleConstructor};

/// Builds `domain##html > body > div:nth-child(2) > img:nth-child(1)` style rules.
///
/// URL rules resolve the request's `url_mask` against the page location and block it with
/// `||host/path`, falling back to an element-hiding rule when no mask is available.
#[derive(Debug, Default, Clone, Copy)]
pub struct StrictPathRules;

impl RuleConstructor for StrictPathRules {
    fn construct_rule_text(&self, dom: &dyn PageDom, node: NodeId, request: &RuleRequest) -> String {
        let page_url = Url::parse(&request.url).ok();
        let domain = page_url
            .as_ref()
            .and_then(|url| url.host_str())
            .filter(|_| request.is_block_one_domain)
            .map(str::to_owned);

        if request.rule_type == RuleType::Url
            && let Some(mask) = request.url_mask.as_deref()
            && let Some(rule) = url_rule(page_url.as_ref(), mask, domain.as_deref())
        {
            return rule;
        }

        format!(
            "{}##{}",
            domain.unwrap_or_default(),
            strict_selector(dom, node)
        )
    }
}

/// Full selector path from the document root down to `node`.
pub fn strict_selector(dom: &dyn PageDom, node: NodeId) -> String {
    let mut chain = dom.parents_level(node);
    chain.reverse();
    chain.push(node);

    chain
        .into_iter()
        .map(|current| segment(dom, current))
        .collect::<Vec<_>>()
        .join(" > ")
}

fn segment(dom: &dyn PageDom, node: NodeId) -> String {
    let tag = dom.tag_name(node).unwrap_or("*");
    if matches!(tag, "html" | "body" | "head") {
        return tag.to_owned();
    }
    if let Some(id) = dom.attribute(node, "id").filter(|id| !id.is_empty()) {
        return format!("{tag}#{id}");
    }
    match dom.parent(node) {
        Some(parent) => {
            let position = dom
                .children(parent)
                .iter()
                .position(|sibling| *sibling == node)
                .map_or(1, |index| index + 1);
            format!("{tag}:nth-child({position})")
        }
        None => tag.to_owned(),
    }
}

fn url_rule(page_url: Option<&Url>, mask: &str, domain: Option<&str>) -> Option<String> {
    let resolved = match page_url {
        Some(base) => base.join(mask).ok()?,
        None => Url::parse(mask).ok()?,
    };
    let host = resolved.host_str()?;
    let mut rule = format!("||{host}{}", resolved.path());
    if let Some(domain) = domain {
        rule.push_str("$domain=");
        rule.push_str(domain);
    }
    Some(rule)
}
