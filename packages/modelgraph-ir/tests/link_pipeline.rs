//! End-to-end link runs over the shop fixture

mod common;

use common::*;
use modelgraph_ir::shared::models::*;
use modelgraph_ir::{link, DefinitionKind, DuplicatePolicy, LinkError, LinkerConfig, MethodKind};
use pretty_assertions::assert_eq;

#[test]
fn test_shop_links() {
    let linked = link(&shop(), &config()).unwrap();
    let stats = &linked.stats;

    assert_eq!(stats.models, 7);
    assert_eq!(stats.data_models, 3);
    assert_eq!(stats.enumerations, 1);
    assert_eq!(stats.dropped_references, 0);
    assert_eq!(stats.reference_cycles, 0);
    // 11 declared, CountOrders skipped, SearchOrdersCount synthesized
    assert_eq!(stats.use_cases, 11);
    assert_eq!(stats.synthesized_use_cases, 1);
    assert_eq!(stats.method_conflicts, 0);

    assert_edges_paired(&linked.model_graph);
    assert_no_dangling(&linked.model_graph);
    assert_aggregate_linkage(&linked.model_graph);
}

#[test]
fn test_aggregate_and_change_tracking() {
    let linked = link(&shop(), &config()).unwrap();
    let graph = &linked.model_graph;

    let order = graph.id_of("Sales", "Order").unwrap();
    let payment = graph.id_of("Sales", "Payment").unwrap();
    let line = graph.id_of("Sales", "OrderLine").unwrap();

    assert_eq!(graph.node(order).children, vec![line, payment]);
    assert_eq!(graph.top_level_aggregates("Sales"), &[order]);
    assert!(graph.has_changes(order));
    assert!(!graph.has_changes(line));
    assert!(graph.has_changes(payment));
}

#[test]
fn test_cross_domain_and_persistence_edges() {
    let linked = link(&shop(), &config()).unwrap();
    let graph = &linked.model_graph;

    let product = graph.get("Catalog", "Product").unwrap();
    assert_eq!(product.referenced_by.len(), 1);
    assert_eq!(product.referenced_by[0].peer.domain, "Sales");
    assert_eq!(product.referenced_by[0].peer.name, "OrderLine");

    let customer = graph.get("Sales", "Customer").unwrap();
    let mut peers: Vec<(&str, Option<bool>)> = customer
        .referenced_by
        .iter()
        .map(|edge| (edge.peer.name.as_str(), edge.peer.model.map(|_| true)))
        .collect();
    peers.sort();
    assert_eq!(peers, vec![("InvoiceRecord", None), ("Order", Some(true))]);
}

#[test]
fn test_exists_shared_between_create_and_update() {
    let linked = link(&shop(), &config()).unwrap();
    let plan = &linked.plan;

    let exists = plan
        .catalogue()
        .lookup("Sales", "Customer", "ExistsAsync")
        .unwrap();
    let create = plan.use_case("Sales", "Order", "CreateOrder").unwrap();
    let update = plan.use_case("Sales", "Order", "UpdateOrder").unwrap();
    assert!(create.methods.contains(&exists));
    assert!(update.methods.contains(&exists));

    let product_exists = plan
        .catalogue()
        .lookup("Catalog", "Product", "ExistsAsync")
        .unwrap();
    assert!(create.methods.contains(&product_exists));
    assert!(!update.methods.contains(&product_exists));
}

#[test]
fn test_delete_attaches_is_used_from_every_referencing_side() {
    let linked = link(&shop(), &config()).unwrap();
    let plan = &linked.plan;
    let delete = plan.use_case("Sales", "Customer", "DeleteCustomer").unwrap();

    let mut buckets: Vec<(String, String, String)> = plan
        .methods_of(delete.id)
        .map(|m| (m.domain.clone(), m.classification_key.clone(), m.name.clone()))
        .collect();
    buckets.sort();
    assert_eq!(
        buckets,
        vec![
            (
                "Billing".to_string(),
                "InvoiceRecord".to_string(),
                "IsUsedCustomerIdAsync".to_string()
            ),
            (
                "Sales".to_string(),
                "Order".to_string(),
                "IsUsedCustomerIdAsync".to_string()
            ),
        ]
    );
    assert!(plan
        .methods_of(delete.id)
        .all(|m| m.kind == MethodKind::IsUsedForeignKey));
}

#[test]
fn test_child_use_case_lives_with_aggregate() {
    let linked = link(&shop(), &config()).unwrap();
    let plan = &linked.plan;

    // Name already mentions the child, so it is kept as declared
    let add_payment = plan.use_case("Sales", "Order", "AddPayment").unwrap();
    assert_eq!(add_payment.namespace, "Acme.Shop.Sales.Orders.Commands.AddPayment");
    assert!(plan
        .methods_of(add_payment.id)
        .any(|m| m.name == "ReadOrderIdByPaymentIdAsync"));
}

#[test]
fn test_feature_names() {
    let linked = link(&shop(), &config()).unwrap();
    let plan = &linked.plan;

    let create_customer = plan.use_case("Sales", "Customer", "CreateCustomer").unwrap();
    assert_eq!(
        create_customer.namespace,
        "Acme.Shop.Sales.Clients.Commands.CreateCustomer"
    );
    let delete_customer = plan.use_case("Sales", "Customer", "DeleteCustomer").unwrap();
    assert_eq!(delete_customer.feature_name.as_deref(), Some("Clients"));

    let delete_category = plan.use_case("Catalog", "Category", "DeleteCategory").unwrap();
    assert_eq!(
        delete_category.namespace,
        "Acme.Shop.Catalog.Taxonomy.Commands.DeleteCategory"
    );
}

#[test]
fn test_count_variant_synthesized_and_declared_one_skipped() {
    let linked = link(&shop(), &config()).unwrap();
    let plan = &linked.plan;

    assert!(plan.use_case("Sales", "Order", "CountOrders").is_none());
    assert_eq!(linked.dto_graph.skipped_count(), 1);

    let search = plan.use_case("Sales", "Order", "SearchOrders").unwrap();
    let count = plan.use_case("Sales", "Order", "SearchOrdersCount").unwrap();
    assert!(count.synthesized);
    assert_eq!(count.namespace, "Acme.Shop.Sales.Orders.Queries.SearchOrdersCount");
    assert_eq!(search.dtos.len(), count.dtos.len());
    assert!(search.dtos.iter().all(|dto| !count.dtos.contains(dto)));
}

#[test]
fn test_missing_command_model_is_fatal() {
    let set = shop().with_use_cases(
        UseCaseDocument::new("Sales").with_use_case(
            UseCaseDef::new("CreateRefund", UseCaseKind::Create)
                .with_dto(DtoDef::new().referencing("Refund")),
        ),
    );
    let err = link(&set, &config()).unwrap_err();
    assert_eq!(
        err.to_string(),
        "Use case 'CreateRefund' in domain 'Sales' references missing domain model 'Refund'"
    );
}

#[test]
fn test_duplicate_policy() {
    let set = shop().with_domain_models(
        DomainModelDocument::new("Sales")
            .with_model(DomainModelDef::new("Customer").tracking_changes()),
    );

    match link(&set, &config()) {
        Err(LinkError::DuplicateDefinition { kind, domain, name }) => {
            assert_eq!(kind, DefinitionKind::DomainModel);
            assert_eq!(domain, "Sales");
            assert_eq!(name, "Customer");
        }
        other => panic!("expected DuplicateDefinition, got {:?}", other.map(|l| l.stats)),
    }

    let lenient = config().with_duplicate_policy(DuplicatePolicy::LastWriteWins);
    let linked = link(&set, &lenient).unwrap();
    let customer = linked.model_graph.get("Sales", "Customer").unwrap();
    assert!(customer.tracks_changes);
    assert_eq!(linked.stats.models, 7);
}

#[test]
fn test_invalid_config_is_rejected() {
    let err = link(&shop(), &LinkerConfig::new("  ")).unwrap_err();
    assert!(matches!(err, LinkError::Config(_)));

    let padded = link(&shop(), &LinkerConfig::new("Acme.Shop ")).unwrap_err();
    assert!(matches!(padded, LinkError::Config(_)));
}

#[test]
fn test_linking_twice_gives_equal_graphs() {
    let first = link(&shop(), &config()).unwrap();
    let second = link(&shop(), &config()).unwrap();

    assert_eq!(first.model_graph, second.model_graph);
    assert_eq!(first.dto_graph, second.dto_graph);
    assert_eq!(first.plan, second.plan);
    assert_eq!(first.to_json().unwrap(), second.to_json().unwrap());
}

#[test]
fn test_emission_order_puts_targets_first() {
    let linked = link(&shop(), &config()).unwrap();
    let graph = &linked.model_graph;
    let order = linked.emission_order();
    let position = |domain: &str, name: &str| {
        let id = graph.id_of(domain, name).unwrap();
        order.iter().position(|&x| x == id).unwrap()
    };

    assert_eq!(order.len(), graph.len());
    assert!(position("Catalog", "Category") < position("Catalog", "Product"));
    assert!(position("Catalog", "Product") < position("Sales", "OrderLine"));
    assert!(position("Sales", "Customer") < position("Sales", "Order"));
}

#[test]
fn test_json_documents_link() {
    let catalog: DomainModelDocument = serde_json::from_str(CATALOG_JSON).unwrap();
    let set = ModelSet::new()
        .with_domain_models(catalog)
        .with_use_cases(catalog_use_cases());
    let linked = link(&set, &config()).unwrap();

    assert_eq!(linked.stats.models, 2);
    let create = linked
        .plan
        .use_case("Catalog", "Product", "CreateProduct")
        .unwrap();
    let names: Vec<&str> = linked
        .plan
        .methods_of(create.id)
        .map(|m| m.name.as_str())
        .collect();
    assert_eq!(names, vec!["ExistsAsync", "IsUniqueSkuAsync"]);
}

#[test]
fn test_config_from_yaml_file() {
    use std::io::Write;

    let mut file = tempfile::NamedTempFile::new().unwrap();
    writeln!(
        file,
        "version: 1\napplication_root_namespace: Contoso\nnaming:\n  method_suffix: ''"
    )
    .unwrap();
    let config = LinkerConfig::from_yaml(file.path().to_str().unwrap()).unwrap();

    let linked = link(&shop(), &config).unwrap();
    let read = linked.plan.use_case("Sales", "Order", "ReadOrder").unwrap();
    assert_eq!(read.namespace, "Contoso.Sales.Orders.Queries.ReadOrder");
    assert_eq!(linked.plan.methods_of(read.id).next().unwrap().name, "ReadOrder");
}
