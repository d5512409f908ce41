//! Call registry
//!
//! x86 output has no call-stack convention here: a `call` is lowered to a
//! `jmp` into the callee plus a labelled return point, and the callee's
//! epilogue jumps back to that label. Labels are assigned per distinct
//! (caller, callee) pair during the pre-scan; each callee keeps a FIFO of
//! return labels its epilogue has not yet claimed.

use log::debug;
use serde::{Deserialize, Serialize};
use std::collections::{HashMap, VecDeque};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CallSite {
    pub caller: String,
    pub callee: String,
    pub return_label: String,
}

#[derive(Debug, Clone)]
pub struct CallRegistry {
    prefix: String,
    sites: Vec<CallSite>,
    /// Unclaimed return labels per callee, in registration order
    pending: HashMap<String, VecDeque<String>>,
}

impl CallRegistry {
    pub fn new(prefix: impl Into<String>) -> Self {
        Self {
            prefix: prefix.into(),
            sites: Vec::new(),
            pending: HashMap::new(),
        }
    }

    fn find(&self, caller: &str, callee: &str) -> Option<&CallSite> {
        self.sites
            .iter()
            .find(|site| site.caller == caller && site.callee == callee)
    }

    /// Ensure a return label exists for `caller -> callee` and return it
    pub fn register(&mut self, caller: &str, callee: &str) -> &str {
        let index = match self
            .sites
            .iter()
            .position(|site| site.caller == caller && site.callee == callee)
        {
            Some(index) => index,
            None => {
                let return_label = format!("{}{}_{}_{}", self.prefix, self.sites.len(), caller, callee);
                debug!("call site {} -> {} returns to {}", caller, callee, return_label);

                self.pending
                    .entry(callee.to_string())
                    .or_default()
                    .push_back(return_label.clone());
                self.sites.push(CallSite {
                    caller: caller.to_string(),
                    callee: callee.to_string(),
                    return_label,
                });
                self.sites.len() - 1
            }
        };
        &self.sites[index].return_label
    }

    /// Return label for a registered pair
    pub fn resolve_return_label(&self, caller: &str, callee: &str) -> Option<&str> {
        self.find(caller, callee).map(|site| site.return_label.as_str())
    }

    /// Claim the oldest unclaimed return label for `callee`
    pub fn consume_one_pending(&mut self, callee: &str) -> Option<String> {
        self.pending.get_mut(callee)?.pop_front()
    }

    pub fn pending_count(&self, callee: &str) -> usize {
        self.pending.get(callee).map_or(0, VecDeque::len)
    }

    pub fn has_pending(&self, callee: &str) -> bool {
        self.pending_count(callee) > 0
    }

    /// Registered call sites in registration order
    pub fn sites(&self) -> &[CallSite] {
        &self.sites
    }

    pub fn len(&self) -> usize {
        self.sites.len()
    }

    pub fn is_empty(&self) -> bool {
        self.sites.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_register_is_idempotent() {
        let mut calls = CallRegistry::new("ret_");
        let first = calls.register("a", "b").to_string();
        let second = calls.register("a", "b").to_string();

        assert_eq!(first, "ret_0_a_b");
        assert_eq!(first, second);
        assert_eq!(calls.len(), 1);
        assert_eq!(calls.pending_count("b"), 1);
        assert_eq!(calls.resolve_return_label("a", "b"), Some("ret_0_a_b"));
        assert_eq!(calls.resolve_return_label("a", "b"), Some("ret_0_a_b"));
    }

    #[test]
    fn test_distinct_pairs_get_distinct_labels() {
        let mut calls = CallRegistry::new("ret_");
        calls.register("a", "c");
        calls.register("b", "c");
        calls.register("c", "a");

        let labels: Vec<&str> = calls.sites().iter().map(|s| s.return_label.as_str()).collect();
        assert_eq!(labels, vec!["ret_0_a_c", "ret_1_b_c", "ret_2_c_a"]);
        assert_eq!(calls.resolve_return_label("b", "a"), None);
    }

    #[test]
    fn test_consume_pending_is_fifo() {
        let mut calls = CallRegistry::new("ret_");
        calls.register("a", "c");
        calls.register("b", "c");

        assert!(calls.has_pending("c"));
        assert_eq!(calls.consume_one_pending("c"), Some("ret_0_a_c".to_string()));
        assert_eq!(calls.consume_one_pending("c"), Some("ret_1_b_c".to_string()));
        assert_eq!(calls.consume_one_pending("c"), None);
        assert!(!calls.has_pending("c"));

        // Consumption does not forget the call site
        assert_eq!(calls.resolve_return_label("a", "c"), Some("ret_0_a_c"));
    }

    #[test]
    fn test_no_callers() {
        let mut calls = CallRegistry::new("ret_");
        assert!(calls.is_empty());
        assert_eq!(calls.pending_count("main"), 0);
        assert_eq!(calls.consume_one_pending("main"), None);
    }
}
