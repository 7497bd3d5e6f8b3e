use emitter::{Emitter, EventType, Handler};
use std::cell::RefCell;
use std::fmt::{Display, Formatter};
use std::rc::Rc;
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
enum Topic {
    Placed,
    Paid,
    Shipped,
}

impl Display for Topic {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Placed => write!(f, "order.placed"),
            Self::Paid => write!(f, "order.paid"),
            Self::Shipped => write!(f, "order.shipped"),
        }
    }
}

#[derive(Debug, Clone)]
struct Order {
    id: u32,
    amount: i64,
}

#[derive(Debug, thiserror::Error)]
enum OrderError {
    #[error("insufficient stock: order={order}, requested={requested}, available={available}")]
    InsufficientStock {
        order: u32,
        requested: i64,
        available: i64,
    },
}

/// 库存服务，作为处理器的执行上下文
#[derive(Debug)]
struct Inventory {
    warehouse: &'static str,
    available: RefCell<i64>,
}

type Bus = Emitter<Topic, Order, Inventory, String>;

fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let bus = Bus::default();
    let inventory = Rc::new(Inventory {
        warehouse: "east-1",
        available: RefCell::new(3),
    });

    // 扣减库存（绑定上下文）
    bus.on_with_context(
        Topic::Placed,
        Handler::typed(|ctx: Option<&Inventory>, order: Option<&Order>, _| {
            let (Some(inventory), Some(order)) = (ctx, order) else {
                return Ok(());
            };
            let mut available = inventory.available.borrow_mut();
            if *available < order.amount {
                return Err(OrderError::InsufficientStock {
                    order: order.id,
                    requested: order.amount,
                    available: *available,
                }
                .into());
            }
            *available -= order.amount;
            info!(
                warehouse = inventory.warehouse,
                order = order.id,
                left = *available,
                "stock reserved"
            );
            Ok(())
        }),
        inventory.clone(),
    );

    // 付款成功后发货：处理器内部重入 emit
    let shipper = bus.clone();
    bus.on(
        Topic::Paid,
        Handler::typed(move |_, order: Option<&Order>, args: &[String]| {
            shipper.emit(Topic::Shipped, order, args)
        }),
    );

    // 审计：接收全部事件
    let audit = Rc::new(RefCell::new(Vec::new()));
    let trail = audit.clone();
    bus.on(
        EventType::Wildcard,
        Handler::wildcard(
            move |_, ty: &EventType<Topic>, order: Option<&Order>, args: &[String]| {
                trail
                    .borrow_mut()
                    .push(format!("{ty} order={:?} via={args:?}", order.map(|o| o.id)));
                Ok(())
            },
        ),
    );

    let channel = vec!["web".to_string()];
    for order in [Order { id: 1, amount: 2 }, Order { id: 2, amount: 2 }] {
        match bus.emit(Topic::Placed, Some(&order), &channel) {
            Ok(()) => bus.emit(Topic::Paid, Some(&order), &channel)?,
            Err(err) => match err.downcast_ref::<OrderError>() {
                Some(reason) => warn!(order = order.id, %reason, "order rejected"),
                None => return Err(err),
            },
        }
    }

    bus.off(Topic::Paid, None);
    bus.emit(Topic::Paid, Some(&Order { id: 3, amount: 1 }), &[])?;

    for line in audit.borrow().iter() {
        info!(entry = %line, "audit");
    }
    info!(
        left = *inventory.available.borrow(),
        types = bus.registered_types().len(),
        "demo finished"
    );

    Ok(())
}
