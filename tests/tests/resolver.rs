//! Resolver integration tests over the shop fixture.

use graft_tests::prelude::*;

mod ad_hoc_predicates {
    use super::*;

    pub fn scenario() -> Scenario {
        Scenario::new("ad_hoc_predicates")
            .fixture("shop")
            .resolve("match_widget", "Product", |a| a.selects(&["widget", "widget_xl"]))
            // Both Steves live on kent st; kent is selected once
            .resolve("match_address_of_steve", "Address", |a| a.selects(&["kent"]))
            .resolve("match_steve_danger", "Customer", |a| a.selects(&["steve_danger"]))
            .resolve("match_bought_gadget", "Customer", |a| a.selects(&["dana"]))
            .resolve("match_orders_of_steve", "Order", |a| {
                a.selects(&["first_order", "empty_order"])
            })
            .resolve("match_over_ten", "Product", |a| a.selects(&["gadget", "widget_xl"]))
            .resolve("match_no_time", "Order", |a| a.selects(&["empty_order"]))
            .resolve("match_name_in", "Product", |a| a.selects(&["gadget"]))
            // The same predicate against a type without the field
            .resolve("match_widget", "Customer", |a| {
                a.error("Unknown field 'name' on type 'Customer'")
            })
    }

    #[test]
    fn test_predicates_select_in_creation_order() {
        scenario().run().unwrap();
    }
}

mod validation {
    use super::*;

    pub fn scenario() -> Scenario {
        Scenario::new("validation")
            .fixture("shop")
            .resolve("match_unknown_relation", "Customer", |a| {
                a.error("Unknown relation 'invoices' on type 'Customer'")
            })
            .resolve("match_unknown_field", "Customer", |a| {
                a.error("Unknown field 'city' on type 'Address' in path 'addresses.city'")
            })
            .resolve("match_widget", "Invoice", |a| a.error("Unknown entity type 'Invoice'"))
            .resolve("demo_query", "Customer", |a| {
                a.error("Expected the condition form")
            })
            .query("match_widget", "cheapProducts", |a| {
                a.error("Expected the named parameter form")
            })
    }

    #[test]
    fn test_invalid_predicates_fail_before_scanning() {
        scenario().run().unwrap();
    }
}

mod predefined_queries {
    use super::*;

    pub fn scenario() -> Scenario {
        Scenario::new("predefined_queries")
            .fixture("shop")
            .query("demo_query", "customerByFirstName", |a| {
                a.selects(&["steve", "steve_danger"])
            })
            .query("query_wrong_param", "customerByFirstName", |a| {
                a.error("Query 'customerByFirstName' has no parameter 'name'")
            })
            // Optional parameter without default: its condition is dropped
            .query("query_first_only", "customersByName", |a| {
                a.selects(&["steve", "steve_danger"])
            })
            .query("query_first_and_last", "customersByName", |a| {
                a.selects(&["steve_danger"])
            })
            .query("query_no_params", "customersByName", |a| {
                a.error("Query 'customersByName' requires parameter 'first'")
            })
            // Optional parameter with default: maxPrice = 10
            .query("query_no_params", "cheapProducts", |a| a.selects(&["widget"]))
            .query("query_max_price", "cheapProducts", |a| {
                a.selects(&["widget", "gadget", "widget_xl"])
            })
            .query("query_dana", "ordersOfCustomer", |a| a.selects(&["dana_order"]))
            .query("query_names_list", "productsNamed", |a| {
                a.selects(&["widget", "gadget", "widget_xl"])
            })
            .query("query_names_scalar", "productsNamed", |a| {
                a.error("operator 'in' requires a list")
            })
            .query("demo_query", "customerByLastName", |a| {
                a.error("Unknown query 'customerByLastName'")
            })
    }

    #[test]
    fn test_named_parameters_bind_to_declared_queries() {
        scenario().run().unwrap();
    }
}

mod determinism {
    use super::*;
    use graft_core::MatchPredicate;
    use graft_pattern::Resolver;
    use serde_json::json;

    #[test]
    fn test_same_snapshot_same_answer() {
        let fixture = Fixture::load("shop").unwrap();
        let resolver = Resolver::new(fixture.registry(), fixture.graph());
        let predicate =
            MatchPredicate::from_json(&json!(["orders.products.price", ">=", 9.5])).unwrap();

        let first = resolver.resolve("Customer", &predicate).unwrap();
        let second = resolver.resolve("Customer", &predicate).unwrap();

        assert_eq!(first, second);
        assert_eq!(fixture.labels_of(&first), vec!["steve", "dana"]);
    }
}
