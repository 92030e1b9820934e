//! Test helpers.

use std::sync::Arc;

use jiff::Timestamp;
use salvo::{affix_state::inject, prelude::*};
use uuid::Uuid;

use storefront_app::{
    auth::{Identity, MockAuthService},
    context::AppContext,
    domain::{
        addresses::MockAddressesService,
        carts::{
            MockCartsService,
            records::{CartLineRecord, CartRecord, CartUuid},
        },
        checkout::MockCheckoutService,
        orders::{
            MockOrdersService,
            data::ShippingAddress,
            records::{OrderItemRecord, OrderRecord, OrderUuid, PopulatedOrderRecord},
            status::{OrderStatus, PaymentMethod},
        },
        products::{
            MockProductsService,
            records::{ProductCategory, ProductRecord, ProductSize, ProductUuid},
        },
        users::{Role, UserUuid},
    },
};

use crate::{extensions::*, state::State};

pub(crate) const TEST_USER_UUID: UserUuid = UserUuid::from_uuid(Uuid::nil());

/// One mock per service. A fresh mock panics on any call, so tests only set
/// expectations on the services the route under test should reach.
#[derive(Default)]
pub(crate) struct TestApp {
    pub(crate) auth: MockAuthService,
    pub(crate) products: MockProductsService,
    pub(crate) carts: MockCartsService,
    pub(crate) orders: MockOrdersService,
    pub(crate) checkout: MockCheckoutService,
    pub(crate) addresses: MockAddressesService,
}

impl TestApp {
    pub(crate) fn into_state(self) -> Arc<State> {
        State::from_app_context(AppContext {
            auth: Arc::new(self.auth),
            products: Arc::new(self.products),
            carts: Arc::new(self.carts),
            orders: Arc::new(self.orders),
            checkout: Arc::new(self.checkout),
            addresses: Arc::new(self.addresses),
        })
    }

    /// Serve `route` without any caller identity.
    pub(crate) fn public_service(self, route: Router) -> Service {
        Service::new(Router::new().hoop(inject(self.into_state())).push(route))
    }

    /// Serve `route` as [`TEST_USER_UUID`] with the `user` role.
    pub(crate) fn user_service(self, route: Router) -> Service {
        Service::new(
            Router::new()
                .hoop(inject(self.into_state()))
                .hoop(inject_user)
                .push(route),
        )
    }
}

#[salvo::handler]
pub(crate) async fn inject_user(
    req: &mut Request,
    depot: &mut Depot,
    res: &mut Response,
    ctrl: &mut FlowCtrl,
) {
    depot.insert_identity(Identity {
        user_uuid: TEST_USER_UUID,
        role: Role::User,
    });

    ctrl.call_next(req, depot, res).await;
}

pub(crate) fn make_product(uuid: ProductUuid) -> ProductRecord {
    ProductRecord {
        uuid,
        name: "Oxford Shirt".to_string(),
        description: "Button-down cotton shirt".to_string(),
        price: 2_500,
        brand_name: "Acme".to_string(),
        color: "Blue".to_string(),
        sizes: vec![ProductSize::M, ProductSize::L],
        image_url: "https://example.com/shirt.png".to_string(),
        category: ProductCategory::Shirts,
        average_rating: 1.0,
        reviews: Vec::new(),
        created_at: Timestamp::UNIX_EPOCH,
        updated_at: Timestamp::UNIX_EPOCH,
    }
}

pub(crate) fn make_cart(lines: Vec<CartLineRecord>) -> CartRecord {
    let total = lines.iter().map(|line| line.line_total).sum();

    CartRecord {
        uuid: CartUuid::from_uuid(Uuid::nil()),
        user_uuid: TEST_USER_UUID,
        lines,
        total,
        created_at: Timestamp::UNIX_EPOCH,
        updated_at: Timestamp::UNIX_EPOCH,
    }
}

pub(crate) fn make_address() -> ShippingAddress {
    ShippingAddress {
        street: "1 High Street".to_string(),
        city: "Leeds".to_string(),
        postal_code: "LS1 1AA".to_string(),
        country: "UK".to_string(),
    }
}

pub(crate) fn make_order(uuid: OrderUuid, status: OrderStatus) -> OrderRecord {
    let item = OrderItemRecord {
        product_uuid: ProductUuid::from_uuid(Uuid::nil()),
        quantity: 2,
        unit_price: 10,
        line_total: 20,
    };

    OrderRecord {
        uuid,
        user_uuid: TEST_USER_UUID,
        items: vec![item],
        total_amount: 20,
        shipping_address: make_address(),
        payment_method: PaymentMethod::CreditCard,
        status,
        ordered_at: Timestamp::UNIX_EPOCH,
        delivery_date: None,
    }
}

/// [`make_order`] with its single item resolved to [`make_product`].
pub(crate) fn make_populated_order(uuid: OrderUuid, status: OrderStatus) -> PopulatedOrderRecord {
    let order = make_order(uuid, status);
    let products = order
        .items
        .iter()
        .map(|item| (item.product_uuid, make_product(item.product_uuid)))
        .collect();

    PopulatedOrderRecord { order, products }
}
