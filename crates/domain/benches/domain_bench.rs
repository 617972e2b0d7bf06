use std::sync::Arc;

use common::CustomerId;
use criterion::{Criterion, criterion_group, criterion_main};
use domain::repository::{CustomerRepository, ProductRepository};
use domain::{
    Customer, CustomerKind, LineRequest, Money, Order, OrderLine, OrderService, PlaceOrder,
    Product,
};
use store::MemoryStore;

fn bench_total_computation(c: &mut Criterion) {
    let lines: Vec<OrderLine> = (0u32..100)
        .map(|i| OrderLine::new(common::ProductId::new(), (i % 7) + 1, Money::from_cents(999)))
        .collect();

    c.bench_function("domain/place_aggregate_100_lines", |b| {
        b.iter(|| Order::place(CustomerId::new(), false, lines.clone()));
    });
}

fn bench_place_order(c: &mut Criterion) {
    let rt = tokio::runtime::Runtime::new().unwrap();

    let (service, customer_id, product_id) = rt.block_on(async {
        let store = MemoryStore::new();
        let service = OrderService::new(
            Arc::new(store.clone()),
            Arc::new(store.clone()),
            Arc::new(store.clone()),
        );

        let customer = Customer::new(
            "Bench",
            "1 Bench St",
            "A",
            CustomerKind::Personal {
                credit_card_id: "0000".to_string(),
            },
        );
        CustomerRepository::insert(&store, &customer).await.unwrap();

        let product = Product::new(
            "SKU-BENCH",
            "Widget",
            "",
            Money::from_cents(1000),
            u32::MAX,
            "bench",
        );
        ProductRepository::insert(&store, &product).await.unwrap();

        (service, customer.id, product.id)
    });

    c.bench_function("domain/place_order", |b| {
        b.iter(|| {
            rt.block_on(async {
                service
                    .place_order(PlaceOrder::new(
                        customer_id,
                        false,
                        vec![LineRequest::new(product_id, 3)],
                    ))
                    .await
                    .unwrap();
            });
        });
    });
}

criterion_group!(benches, bench_total_computation, bench_place_order);
criterion_main!(benches);
