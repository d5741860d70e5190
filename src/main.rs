use std::io::{self, Write};

use clyre::{init_logging, EnvConfig, Shell};
use clyre_api::{
    cancel, cancellation_signal, is_cancelled, MessageRole, SessionState, StreamEventKind,
};
use futures_util::{pin_mut, StreamExt};
use tracing::info;

#[tokio::main(flavor = "current_thread")]
async fn main() -> io::Result<()> {
    let config = EnvConfig::from_env().map_err(io::Error::other)?;
    init_logging(config.log_filter());

    let prompt = std::env::args().skip(1).collect::<Vec<_>>().join(" ");
    if prompt.trim().is_empty() {
        return Err(io::Error::new(
            io::ErrorKind::InvalidInput,
            "usage: clyre <prompt>",
        ));
    }

    let shell = Shell::new(config.api_config()).map_err(io::Error::other)?;
    if shell.bootstrap().await != SessionState::Authenticated {
        let Some(credentials) = config.credentials() else {
            return Err(io::Error::new(
                io::ErrorKind::PermissionDenied,
                "not signed in; set CLYRE_EMAIL and CLYRE_PASSWORD",
            ));
        };
        shell.login(&credentials).await.map_err(io::Error::other)?;
    }

    let mut stdout = io::stdout().lock();

    if config.no_stream {
        shell.threads.append_user_message(prompt.as_str());
        shell
            .threads
            .generate_assistant_message(&prompt)
            .await
            .map_err(io::Error::other)?;
        let reply = shell
            .threads
            .current()
            .messages()
            .into_iter()
            .rev()
            .find(|message| message.role == MessageRole::Assistant)
            .map(|message| message.content)
            .unwrap_or_default();
        writeln!(stdout, "{reply}")?;
        return Ok(());
    }

    let signal = cancellation_signal();
    let ctrl_c = signal.clone();
    tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            cancel(&ctrl_c);
        }
    });

    let events = shell.ask(&prompt, Some(signal.clone()));
    pin_mut!(events);
    while let Some(event) = events.next().await {
        if event.kind() == StreamEventKind::Chunk {
            if let Some(chunk) = event.chunk.as_deref() {
                write!(stdout, "{chunk}")?;
                stdout.flush()?;
            }
        }
    }
    writeln!(stdout)?;

    if is_cancelled(Some(&signal)) {
        info!("cancelled");
    }
    info!(thread_id = %shell.threads.current_id(), "conversation saved");
    Ok(())
}
