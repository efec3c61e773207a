//! Thin binary wiring [`bidi_mapper::MapperEngine`] to a real CDP
//! WebSocket connection and a client-facing BiDi WebSocket listener.
//!
//! The BiDi transport itself (framing multiple concurrent clients, auth,
//! TLS) is named out of scope by the spec (§1 "named out-of-scope
//! collaborators"); this binary supports exactly one BiDi client
//! connection at a time, which is enough to drive the engine end-to-end
//! for manual testing and the workspace's own integration tests.

use std::net::SocketAddr;
use std::sync::Arc;

use bidi_cdp::protocol::{fetch, target};
use bidi_cdp::CdpConnection;
use bidi_mapper::{Dispatcher, MapperConfig, MapperEngine, MapperOutput};
use bidi_types::CommandFrame;
use clap::Parser;
use futures_util::{SinkExt, StreamExt};
use tokio::net::TcpListener;
use tokio_tungstenite::tungstenite::Message;
use tracing::{error, info, warn};
use tracing_subscriber::EnvFilter;

/// Runs the BiDi/CDP mapper as a standalone process.
#[derive(Parser, Debug)]
#[command(name = "bidi-mapper-session", version, about)]
struct Args {
    /// WebSocket debugger URL for the browser to drive, e.g.
    /// `ws://127.0.0.1:9222/devtools/browser/<id>`.
    #[arg(long)]
    cdp_url: String,

    /// Address the BiDi client listener binds to.
    #[arg(long, default_value = "127.0.0.1:9339")]
    listen: SocketAddr,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    let args = Args::parse();

    let cdp = CdpConnection::connect(&args.cdp_url).await?;
    info!(cdp_url = %args.cdp_url, "connected to browser");

    let (engine, outbound) = MapperEngine::new(cdp, MapperConfig::default());

    enable_auto_attach(&engine).await?;
    tokio::spawn(enable_target_domains(Arc::clone(&engine)));
    bidi_mapper::spawn_event_loop(Arc::clone(&engine));

    let dispatcher = Arc::new(Dispatcher::new(Arc::clone(&engine)));
    serve(args.listen, dispatcher, outbound).await
}

/// Tells the browser to attach the mapper to every page target as it's
/// created (spec §2: "one CDP target per BiDi browsing context").
async fn enable_auto_attach(engine: &Arc<MapperEngine>) -> anyhow::Result<()> {
    let _: serde_json::Value = engine
        .cdp
        .send_command(
            "Target.setAutoAttach",
            Some(target::SetAutoAttachParams {
                auto_attach: true,
                wait_for_debugger_on_start: false,
                flatten: true,
            }),
            None,
        )
        .await?;
    Ok(())
}

/// For every target session the browser attaches us to, enables the CDP
/// domains the event processor depends on. Runs for the engine's
/// lifetime on its own subscription to the CDP broadcast stream.
async fn enable_target_domains(engine: Arc<MapperEngine>) {
    let mut events = engine.cdp.subscribe_events();
    loop {
        let event = match events.recv().await {
            Ok(event) => event,
            Err(tokio::sync::broadcast::error::RecvError::Lagged(_)) => continue,
            Err(tokio::sync::broadcast::error::RecvError::Closed) => break,
        };
        if event.method != "Target.attachedToTarget" {
            continue;
        }
        let Ok(attached) = event.params_as::<target::AttachedToTargetEvent>() else {
            continue;
        };
        if attached.target_info.target_type != "page" {
            continue;
        }
        let session = attached.session_id.as_str();
        for (method, result) in [
            (
                "Page.enable",
                engine
                    .cdp
                    .send_command::<(), serde_json::Value>("Page.enable", None, Some(session))
                    .await,
            ),
            (
                "Runtime.enable",
                engine
                    .cdp
                    .send_command::<(), serde_json::Value>("Runtime.enable", None, Some(session))
                    .await,
            ),
            (
                "Network.enable",
                engine
                    .cdp
                    .send_command::<(), serde_json::Value>("Network.enable", None, Some(session))
                    .await,
            ),
            (
                "Fetch.enable",
                engine
                    .cdp
                    .send_command::<fetch::EnableParams, serde_json::Value>(
                        "Fetch.enable",
                        Some(fetch::EnableParams {
                            patterns: None,
                            handle_auth_requests: Some(true),
                        }),
                        Some(session),
                    )
                    .await,
            ),
        ] {
            if let Err(err) = result {
                warn!(%err, method, session, "failed to enable CDP domain for new target");
            }
        }
    }
}

/// Accepts the one BiDi client connection this process serves: one task
/// reads command frames off the socket and hands them to the dispatcher,
/// another drains the engine's outbound stream back onto the same
/// socket. The process exits once that client disconnects.
async fn serve(
    addr: SocketAddr,
    dispatcher: Arc<Dispatcher>,
    mut outbound: tokio::sync::mpsc::UnboundedReceiver<MapperOutput>,
) -> anyhow::Result<()> {
    let listener = TcpListener::bind(addr).await?;
    info!(%addr, "listening for a BiDi client connection");

    let (stream, peer) = listener.accept().await?;
    info!(%peer, "BiDi client connected");
    let ws = tokio_tungstenite::accept_async(stream).await?;
    let (mut write, mut read) = ws.split();

    let write_task = tokio::spawn(async move {
        while let Some(output) = outbound.recv().await {
            let frame = match output {
                MapperOutput::Success(frame) => serde_json::to_string(&frame),
                MapperOutput::Error(frame) => serde_json::to_string(&frame),
                MapperOutput::Event(frame) => serde_json::to_string(&frame),
            };
            match frame {
                Ok(text) => {
                    if write.send(Message::Text(text.into())).await.is_err() {
                        break;
                    }
                }
                Err(err) => warn!(%err, "failed to serialize outbound BiDi frame"),
            }
        }
    });

    while let Some(msg) = read.next().await {
        match msg {
            Ok(Message::Text(text)) => match serde_json::from_str::<CommandFrame>(&text) {
                Ok(frame) => dispatcher.dispatch(frame),
                Err(err) => warn!(%err, "failed to parse inbound BiDi command frame"),
            },
            Ok(Message::Close(_)) => break,
            Ok(_) => {}
            Err(err) => {
                error!(%err, "BiDi client WebSocket error");
                break;
            }
        }
    }

    info!(%peer, "BiDi client disconnected");
    dispatcher.fail_all_in_flight();
    write_task.abort();
    Ok(())
}
