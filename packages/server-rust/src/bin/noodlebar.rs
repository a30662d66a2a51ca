//! Demo driver: builds the app, walks through a customer's visit, and prints
//! each response as JSON.

use clap::Parser;
use noodlebar_core::messages::{
    CreateOrderEvent, Message, OrderDetails, RequestAllMenuItemsEvent, RequestAllOrdersEvent,
    RequestOrderStatusEvent,
};
use noodlebar_server::{init_logging, LogFormat, NoodlebarApp, ServerConfig};
use tracing::info;

#[derive(Debug, Parser)]
#[command(name = "noodlebar", version, about = "Yummy noodle bar ordering backend")]
struct Args {
    /// Node identifier used in log fields.
    #[arg(long, env = "NOODLEBAR_NODE_ID", default_value = "noodlebar-0")]
    node_id: String,

    /// Status label assigned to every new order.
    #[arg(long, env = "NOODLEBAR_INITIAL_STATUS", default_value = "received")]
    initial_status: String,

    /// Fresh keys to try before giving up on a collision.
    #[arg(long, env = "NOODLEBAR_KEY_ATTEMPTS", default_value_t = 8)]
    key_attempts: u32,

    /// Start with an empty menu instead of the default catalog.
    #[arg(long, env = "NOODLEBAR_EMPTY_MENU")]
    empty_menu: bool,

    #[arg(long, env = "NOODLEBAR_LOG_FORMAT", value_enum, default_value_t = LogFormat::Compact)]
    log_format: LogFormat,
}

impl Args {
    fn server_config(&self) -> ServerConfig {
        ServerConfig {
            node_id: self.node_id.clone(),
            initial_order_status: self.initial_status.clone(),
            key_generation_attempts: self.key_attempts,
            seed_default_menu: !self.empty_menu,
        }
    }
}

async fn show(app: &NoodlebarApp, request: Message) -> anyhow::Result<Message> {
    let response = app.handle(request).await?;
    println!("{}", serde_json::to_string_pretty(&response)?);
    Ok(response)
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let args = Args::parse();
    init_logging(args.log_format)?;

    let app = NoodlebarApp::new(args.server_config())?;
    app.start().await?;

    show(
        &app,
        Message::RequestAllMenuItems {
            payload: RequestAllMenuItemsEvent {},
        },
    )
    .await?;

    let created = show(
        &app,
        Message::CreateOrder {
            payload: CreateOrderEvent::new(
                OrderDetails::for_customer("Jane", "1 Road", "90210").with_item("YM1", 2),
            ),
        },
    )
    .await?;

    if let Message::OrderCreated { payload } = created {
        show(
            &app,
            Message::RequestOrderStatus {
                payload: RequestOrderStatusEvent {
                    order_id: payload.new_order_key,
                },
            },
        )
        .await?;
    }

    show(
        &app,
        Message::RequestAllOrders {
            payload: RequestAllOrdersEvent {},
        },
    )
    .await?;

    info!("demo complete");
    app.shutdown(false).await
}
