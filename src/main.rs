// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

use std::{process, time::Duration};

use axum_server::Handle;
use portal_server::{
    api::router,
    config::{AdminSeed, AuthSettings, ServerSettings},
    services::accounts,
    state::AppState,
    telemetry::init_tracing,
};

#[tokio::main]
async fn main() {
    let server = match ServerSettings::from_env() {
        Ok(settings) => settings,
        Err(err) => {
            eprintln!("invalid server configuration: {err}");
            process::exit(1);
        }
    };
    init_tracing(server.log_format);

    let auth = match AuthSettings::from_env() {
        Ok(settings) => settings,
        Err(err) => {
            tracing::error!(error = %err, "invalid auth configuration");
            process::exit(1);
        }
    };
    tracing::info!(
        issuer = auth.issuer(),
        token_ttl_secs = auth.token_ttl_secs(),
        leeway_secs = auth.leeway_secs(),
        "auth configured"
    );

    let state = AppState::in_memory(&auth);

    if let Some(seed) = AdminSeed::from_env() {
        if let Err(err) = accounts::seed_admin(state.users.as_ref(), &seed.email, &seed.password).await {
            tracing::error!(error = %err, "failed to seed admin account");
            process::exit(1);
        }
    }

    let app = router(state);

    let handle = Handle::new();
    let shutdown = handle.clone();
    tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            tracing::info!("shutdown signal received");
            shutdown.graceful_shutdown(Some(Duration::from_secs(10)));
        }
    });

    tracing::info!(addr = %server.bind_addr, "Portal server listening (docs at /docs)");

    if let Err(err) = axum_server::bind(server.bind_addr)
        .handle(handle)
        .serve(app.into_make_service())
        .await
    {
        tracing::error!(error = %err, "server failed");
        process::exit(1);
    }
}

