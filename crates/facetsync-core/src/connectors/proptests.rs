//! Property-based tests for the refinement codecs.

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use crate::connector::{Connector, NumericRefinement};
    use crate::connectors::{HitsPerPage, HitsPerPageItem, Menu, Pagination};
    use crate::context::Context;
    use crate::state::SearchState;
    use proptest::prelude::*;
    use serde_json::{json, Value};

    fn context() -> impl Strategy<Value = Context> {
        prop_oneof![
            "[a-z]{1,8}".prop_map(|index| Context::single(index)),
            "[a-z]{1,8}".prop_map(|index| Context::multi(index)),
        ]
    }

    /// Arbitrary states mixing flat keys, menu namespaces and index scopes.
    fn search_state() -> impl Strategy<Value = SearchState> {
        let scalar = prop_oneof![
            any::<i64>().prop_map(Value::from),
            "[a-zA-Z0-9 ]{0,6}".prop_map(Value::from),
        ];
        let flat = prop::collection::btree_map("[a-z]{1,6}", scalar.clone(), 0..4);
        let menus = prop::collection::btree_map("[a-z]{1,6}", "[a-zA-Z]{0,6}", 0..3);
        let indices = prop::collection::btree_map(
            "[a-z]{1,4}",
            (prop::collection::btree_map("[a-z]{1,6}", scalar, 0..3), menus.clone()),
            0..3,
        );

        (flat, menus, indices).prop_map(|(flat, menus, indices)| {
            let mut state = serde_json::Map::new();
            for (key, value) in flat {
                state.insert(key, value);
            }
            if !menus.is_empty() {
                state.insert("menu".to_string(), json!(menus));
            }
            let mut scoped = serde_json::Map::new();
            for (index, (keys, menus)) in indices {
                let mut index_state: serde_json::Map<String, Value> = keys.into_iter().collect();
                if !menus.is_empty() {
                    index_state.insert("menu".to_string(), json!(menus));
                }
                scoped.insert(index, Value::Object(index_state));
            }
            if !scoped.is_empty() {
                state.insert("indices".to_string(), Value::Object(scoped));
            }
            SearchState::from(state)
        })
    }

    proptest! {
        #[test]
        fn test_menu_clean_up_idempotent(state in search_state(), ctx in context(), attr in "[a-z]{1,6}") {
            let menu = Menu::new(attr);
            let once = menu.clean_up(&state, &ctx);
            prop_assert_eq!(menu.clean_up(&once, &ctx), once);
        }

        #[test]
        fn test_pagination_clean_up_idempotent(state in search_state(), ctx in context()) {
            let pagination = Pagination::new();
            let once = pagination.clean_up(&state, &ctx);
            prop_assert_eq!(pagination.clean_up(&once, &ctx), once);
        }

        #[test]
        fn test_hits_per_page_clean_up_idempotent(state in search_state(), ctx in context()) {
            let hpp = HitsPerPage::new(10, vec![HitsPerPageItem::new(10)]);
            let once = hpp.clean_up(&state, &ctx);
            prop_assert_eq!(hpp.clean_up(&once, &ctx), once);
        }

        #[test]
        fn test_pagination_refine_decodes(state in search_state(), ctx in context(), page in 1..10_000i64) {
            let pagination = Pagination::new();
            let next = pagination.refine(&state, NumericRefinement::Number(page), &ctx);
            prop_assert_eq!(pagination.current_refinement(&next, &ctx), page);

            // URL-deserialized states carry the page as text
            let next = pagination.refine(&state, NumericRefinement::Text(page.to_string()), &ctx);
            prop_assert_eq!(pagination.current_refinement(&next, &ctx), page);
        }

        #[test]
        fn test_hits_per_page_refine_decodes(state in search_state(), ctx in context(), hits in 1..1_000i64) {
            let hpp = HitsPerPage::new(10, vec![HitsPerPageItem::new(10)]);
            let next = hpp.refine(&state, NumericRefinement::Number(hits), &ctx);
            prop_assert_eq!(hpp.current_refinement(&next, &ctx), hits);
        }

        #[test]
        fn test_menu_refine_decodes(
            state in search_state(),
            ctx in context(),
            attr in "[a-z]{1,6}",
            value in proptest::option::of("[a-zA-Z]{0,6}"),
        ) {
            let menu = Menu::new(attr);
            let next = menu.refine(&state, value.clone(), &ctx);
            let expected = value.filter(|v| !v.is_empty());
            prop_assert_eq!(menu.current_refinement(&next, &ctx), expected);
        }

        #[test]
        fn test_refine_isolates_indices(
            state in search_state(),
            target in "[a-z]{1,4}",
            attr in "[a-z]{1,6}",
            value in "[a-zA-Z]{1,6}",
            page in 1..100i64,
        ) {
            let ctx = Context::multi(target.clone());
            let after_menu = Menu::new(attr).refine(&state, Some(value), &ctx);
            let after_page = Pagination::new().refine(&after_menu, NumericRefinement::Number(page), &ctx);

            let before = state.get_key("indices").and_then(Value::as_object).cloned().unwrap_or_default();
            let after = after_page.get_key("indices").and_then(Value::as_object).cloned().unwrap_or_default();
            for (index, scoped) in &before {
                if index != &target {
                    prop_assert_eq!(after.get(index), Some(scoped));
                }
            }
            for (key, value) in state.as_map() {
                if key != "indices" {
                    prop_assert_eq!(after_page.get_key(key), Some(value));
                }
            }
        }
    }
}
