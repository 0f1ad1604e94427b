//! # Operator Loop
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                         UI Loop                                         │
//! │                                                                         │
//! │   stdin line ──┐                                                        │
//! │                ├──► tokio::select! ──► Console                          │
//! │   PollEvent ───┘                        │                               │
//! │                                         ├─ edit form open?  → edit      │
//! │                                         ├─ pricing form open? → state   │
//! │                                         └─ otherwise        → Command   │
//! │                                                                         │
//! │   after every step: Run / Pause ──► watch ──► Poller                    │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use std::io::Write as _;

use tokio::io::{AsyncBufReadExt, BufReader};
use tokio::sync::watch;
use tracing::{info, warn};

use grocer_core::CheckoutReceipt;

use crate::client::ApiClient;
use crate::command::{Command, HELP};
use crate::config::ConsoleConfig;
use crate::display::{format_cart, format_history, format_inventory, format_receipt};
use crate::poller::{PollEvent, Poller, PollerControl};
use crate::receipt::{save_png, terminal_qr};
use crate::state::{ConsoleState, FormStep, Mode, PricingForm, ScanOutcome};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Flow {
    Continue,
    Quit,
}

pub struct Console {
    client: ApiClient,
    config: ConsoleConfig,
    state: ConsoleState,
    control: watch::Sender<PollerControl>,
    /// Form opened by `update <id>`. Saving it never touches the cart.
    edit: Option<PricingForm>,
}

impl Console {
    pub fn new(
        client: ApiClient,
        config: ConsoleConfig,
        state: ConsoleState,
        control: watch::Sender<PollerControl>,
    ) -> Self {
        Console {
            client,
            config,
            state,
            control,
            edit: None,
        }
    }

    pub fn state(&self) -> &ConsoleState {
        &self.state
    }

    /// Pauses the poller while any form is open.
    pub fn sync_poller(&self) {
        let desired = if self.edit.is_some() {
            PollerControl::Pause
        } else {
            self.state.polling()
        };
        self.control.send_if_modified(|current| {
            if *current == desired {
                false
            } else {
                *current = desired;
                true
            }
        });
    }

    fn show_prompt(&self) {
        let prompt = match (&self.edit, self.state.pending_prompt()) {
            (Some(form), _) => form.prompt(),
            (None, Some(prompt)) => prompt,
            (None, None) => "> ".to_string(),
        };
        print!("{prompt}");
        let _ = std::io::stdout().flush();
    }

    // ===== Poll Events =====

    /// Returns whether anything was printed.
    pub fn handle_event(&mut self, event: PollEvent) -> bool {
        match event {
            PollEvent::Latest(product) => {
                if self.edit.is_some() {
                    return false;
                }
                let barcode = product.barcode.clone();
                match self.state.on_latest(product) {
                    ScanOutcome::Ignored => return false,
                    ScanOutcome::Added(name) => {
                        info!(%barcode, "Scanned product added to cart");
                        println!("\nAdded {name} to cart (total {})", self.state.cart().total());
                    }
                    ScanOutcome::NeedsPricing(_) => {
                        info!(%barcode, "Scanned product needs pricing");
                        println!("\nNew product {barcode} needs a price. Type 'cancel' to skip.");
                    }
                    ScanOutcome::CartRejected(e) => {
                        println!("\nCould not add {barcode}: {e}");
                    }
                }
            }
            PollEvent::Unreachable(message) => {
                println!("\nServer unreachable: {message}");
            }
            PollEvent::Reconnected => {
                println!("\nServer reachable again");
            }
        }
        true
    }

    // ===== Operator Input =====

    pub async fn handle_line(&mut self, line: &str) -> Flow {
        if self.edit.is_some() {
            self.edit_input(line).await;
            return Flow::Continue;
        }

        if let Some(step) = self.state.form_input(line) {
            self.pricing_input(step).await;
            return Flow::Continue;
        }

        match line.parse::<Command>() {
            Ok(command) => self.run_command(command).await,
            Err(message) => {
                println!("{message}");
                Flow::Continue
            }
        }
    }

    async fn pricing_input(&mut self, step: FormStep) {
        match step {
            FormStep::Prompt(_) => {}
            FormStep::Retry { error, .. } => println!("{error}"),
            FormStep::Cancelled => println!("Pricing skipped"),
            FormStep::Submit { id, update } => match self.client.update(id, &update).await {
                Ok(_) => match self.state.pricing_saved() {
                    ScanOutcome::Added(name) => {
                        println!("Saved {name} and added it to the cart (total {})", self.state.cart().total());
                    }
                    ScanOutcome::CartRejected(e) => println!("Saved, but not added to the cart: {e}"),
                    ScanOutcome::Ignored | ScanOutcome::NeedsPricing(_) => {}
                },
                Err(e) => {
                    warn!(id, error = %e, "Saving pricing failed");
                    println!("Save failed: {e}");
                }
            },
        }
    }

    async fn edit_input(&mut self, line: &str) {
        let Some(form) = self.edit.as_mut() else {
            return;
        };

        match form.input(line) {
            FormStep::Prompt(_) => {}
            FormStep::Retry { error, .. } => println!("{error}"),
            FormStep::Cancelled => {
                self.edit = None;
                println!("Edit cancelled");
            }
            FormStep::Submit { id, update } => match self.client.update(id, &update).await {
                Ok(ack) => {
                    self.edit = None;
                    println!("{}", ack.message);
                }
                Err(e) => println!("Save failed: {e}"),
            },
        }
    }

    async fn run_command(&mut self, command: Command) -> Flow {
        match command {
            Command::Nothing => {}
            Command::Help => println!("{HELP}"),
            Command::Quit => return Flow::Quit,
            Command::Cart => println!("{}", format_cart(self.state.cart())),
            Command::Remove(barcode) => match self.state.cart_mut().remove(&barcode) {
                Ok(line) => println!("Removed {} from cart", line.name),
                Err(e) => println!("{e}"),
            },
            Command::Clear => {
                self.state.cart_mut().clear();
                println!("Cart cleared");
            }
            Command::Checkout => self.checkout().await,
            Command::Inventory => match self.client.list().await {
                Ok(products) => {
                    println!("{}", format_inventory(&products, self.config.low_stock_threshold))
                }
                Err(e) => println!("Could not load inventory: {e}"),
            },
            Command::History(limit) => match self.client.history(limit).await {
                Ok(lines) => println!("{}", format_history(&lines)),
                Err(e) => println!("Could not load history: {e}"),
            },
            Command::Update(id) => match self.client.get_by_id(id).await {
                Ok(product) => {
                    println!("Editing {} ({}). Type 'cancel' to stop.", product.name, product.barcode);
                    self.edit = Some(PricingForm::new(product));
                }
                Err(e) => println!("Could not load product {id}: {e}"),
            },
            Command::Delete(id) => match self.client.delete(id).await {
                Ok(ack) => println!("{}", ack.message),
                Err(e) => println!("Could not delete product {id}: {e}"),
            },
            Command::Ip => match self.client.server_ip().await {
                Ok(address) => println!(
                    "Server address: {} (console connected to {})",
                    address.ip,
                    self.client.base_url()
                ),
                Err(e) => println!("Could not get server address: {e}"),
            },
        }
        Flow::Continue
    }

    async fn checkout(&mut self) {
        if self.state.cart().is_empty() {
            println!("Cart is empty");
            return;
        }

        match self.client.checkout(self.state.cart().checkout_items()).await {
            Ok(receipt) => {
                self.state.checkout_succeeded();
                info!(reference = %receipt.reference, total = %receipt.total, "Checkout completed");
                self.show_receipt(&receipt).await;
            }
            Err(e) => {
                warn!(error = %e, "Checkout failed");
                println!("Checkout failed, cart kept: {e}");
            }
        }
    }

    async fn show_receipt(&self, receipt: &CheckoutReceipt) {
        println!("{}", receipt.message);
        println!("{}", format_receipt(receipt));

        match save_png(&self.config.receipt_dir, &receipt.reference, &receipt.qr_code).await {
            Ok(path) => println!("Receipt saved to {}", path.display()),
            Err(e) => {
                warn!(error = %e, "Saving receipt failed");
                println!("Receipt not saved: {e}");
            }
        }

        match terminal_qr(receipt.total, &receipt.reference) {
            Ok(drawing) => println!("{drawing}\nScan with payment app"),
            Err(e) => println!("QR code unavailable: {e}"),
        }
    }
}

/// Runs the console until `quit` or end of input.
pub async fn run(config: ConsoleConfig) -> anyhow::Result<()> {
    let client = ApiClient::new(&config.server_url, config.http_timeout)?;

    let baseline = match client.latest().await {
        Ok(latest) => latest,
        Err(e) => {
            warn!(error = %e, "Server not reachable at startup");
            println!("Server not reachable yet ({e}); polling will keep trying");
            None
        }
    };
    let state = ConsoleState::with_baseline(baseline.as_ref());

    let (mut events, control, poller) = Poller::spawn(client.clone(), config.poll_interval);

    println!("Grocer POS console connected to {}", client.base_url());
    println!("{HELP}");

    let mut console = Console::new(client, config, state, control);
    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    console.show_prompt();

    loop {
        let printed = tokio::select! {
            line = lines.next_line() => match line? {
                Some(line) => {
                    if console.handle_line(&line).await == Flow::Quit {
                        break;
                    }
                    true
                }
                None => break,
            },
            Some(event) = events.recv() => console.handle_event(event),
        };

        console.sync_poller();
        if printed {
            console.show_prompt();
        }
    }

    if matches!(console.state().mode(), Mode::PendingNewProduct(_)) {
        info!("Exiting with an unsaved pricing form");
    }
    drop(console);
    drop(events);
    poller.await?;
    println!("Bye");
    Ok(())
}
