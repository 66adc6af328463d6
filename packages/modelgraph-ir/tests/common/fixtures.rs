//! Model-set fixtures
//!
//! `shop()` is a three-domain shop: a catalog, a sales context with an order
//! aggregate, and a billing context that only references sales through its
//! persistence model.

use modelgraph_ir::shared::models::*;
use modelgraph_ir::LinkerConfig;

pub fn config() -> LinkerConfig {
    LinkerConfig::new("Acme.Shop")
}

pub fn catalog_models() -> DomainModelDocument {
    DomainModelDocument::new("Catalog")
        .with_model(DomainModelDef::new("Category").with_feature_name("Taxonomy"))
        .with_model(
            DomainModelDef::new("Product")
                .with_property(
                    PropertyDef::new("Sku", "string").with_rule(ValidationRule::unique(Vec::new())),
                )
                .with_property(PropertyDef::new("CategoryId", "Guid").reference_to("Category")),
        )
}

pub fn sales_models() -> DomainModelDocument {
    DomainModelDocument::new("Sales")
        .with_model(DomainModelDef::new("Customer").with_property(
            PropertyDef::new("Email", "string").with_rule(ValidationRule::unique(Vec::new())),
        ))
        .with_model(
            DomainModelDef::new("Order")
                .aggregate()
                .with_child("OrderLine")
                .with_child("Payment")
                .with_property(PropertyDef::new("CustomerId", "Guid").reference_to("Customer")),
        )
        .with_model(
            DomainModelDef::new("OrderLine").with_property(
                PropertyDef::new("ProductId", "Guid")
                    .reference_to("Product")
                    .in_domain("Catalog"),
            ),
        )
        .with_model(DomainModelDef::new("Payment").tracking_changes())
}

pub fn billing_models() -> DomainModelDocument {
    DomainModelDocument::new("Billing")
        .with_model(DomainModelDef::new("Invoice").with_data_model("InvoiceRecord"))
}

pub fn data_models() -> Vec<DataModelDocument> {
    vec![
        DataModelDocument::new("Sales")
            .with_data_model(DataModelDef::new("Customer"))
            .with_data_model(DataModelDef::new("Order")),
        DataModelDocument::new("Billing").with_data_model(
            DataModelDef::new("InvoiceRecord").with_property(
                DataPropertyDef::new("CustomerId", "Guid").referencing("Sales", "Customer"),
            ),
        ),
    ]
}

pub fn order_dto() -> DtoDef {
    DtoDef::named("Order")
        .referencing("Order")
        .with_property(DtoPropertyDef::new("CustomerId", "Guid"))
}

pub fn sales_use_cases() -> UseCaseDocument {
    UseCaseDocument::new("Sales")
        .with_use_case(
            UseCaseDef::new("CreateOrder", UseCaseKind::Create)
                .with_main_dto("Order")
                .with_dto(order_dto().with_property(DtoPropertyDef::new("Lines", "Line").collection()))
                .with_dto(
                    DtoDef::named("Line")
                        .referencing("OrderLine")
                        .with_property(DtoPropertyDef::new("ProductId", "Guid")),
                ),
        )
        .with_use_case(UseCaseDef::new("UpdateOrder", UseCaseKind::Update).with_dto(order_dto()))
        .with_use_case(UseCaseDef::new("DeleteOrder", UseCaseKind::Delete).for_model("Order"))
        .with_use_case(UseCaseDef::new("DeleteCustomer", UseCaseKind::Delete).for_model("Customer"))
        .with_use_case(
            UseCaseDef::new("AddPayment", UseCaseKind::Create)
                .with_dto(DtoDef::new().referencing("Payment")),
        )
        .with_use_case(
            UseCaseDef::new("CreateCustomer", UseCaseKind::Create)
                .with_feature_name("Clients")
                .with_dto(DtoDef::new().referencing("Customer")),
        )
        .with_use_case(
            UseCaseDef::new("ReadOrder", UseCaseKind::Read)
                .for_model("Order")
                .with_dto(DtoDef::named("Details").referencing("Order")),
        )
        .with_use_case(
            UseCaseDef::new("SearchOrders", UseCaseKind::Search)
                .with_classification_key("Order")
                .with_dto(DtoDef::named("Row").referencing("Order")),
        )
        .with_use_case(
            UseCaseDef::new("CountOrders", UseCaseKind::SearchCount).with_classification_key("Order"),
        )
}

pub fn catalog_use_cases() -> UseCaseDocument {
    UseCaseDocument::new("Catalog")
        .with_use_case(
            UseCaseDef::new("CreateProduct", UseCaseKind::Create).with_dto(
                DtoDef::new()
                    .referencing("Product")
                    .with_property(DtoPropertyDef::new("CategoryId", "Guid")),
            ),
        )
        .with_use_case(UseCaseDef::new("DeleteCategory", UseCaseKind::Delete).for_model("Category"))
}

pub fn shop() -> ModelSet {
    let mut set = ModelSet::new()
        .with_domain_models(catalog_models())
        .with_domain_models(sales_models())
        .with_domain_models(billing_models())
        .with_enumerations(
            EnumerationDocument::new("Sales").with_enumeration(
                EnumerationDef::new("OrderStatus")
                    .with_item("Draft", None)
                    .with_item("Placed", None)
                    .with_item("Shipped", Some(10)),
            ),
        )
        .with_use_cases(sales_use_cases())
        .with_use_cases(catalog_use_cases());
    for document in data_models() {
        set = set.with_data_models(document);
    }
    set
}

/// The catalog domain as the parsing layer would hand it over
pub const CATALOG_JSON: &str = r#"{
    "domain": "Catalog",
    "models": [
        { "name": "Category", "feature_name": "Taxonomy" },
        { "name": "Product",
          "properties": [
            { "name": "Sku", "type_name": "string",
              "validation_rules": [{ "kind": "Unique" }] },
            { "name": "CategoryId", "type_name": "Guid",
              "is_reference": true, "reference_type": "Category" }
          ] }
    ]
}"#;
