//! CLI command handlers.

use std::path::Path;
use std::sync::Arc;

use annadata_advisory::{variants::VoiceSearchInput, Advice, Advisor, Advisory};
use annadata_core::{config, traits::Provider};
use annadata_i18n::{Language, Localizer};
use annadata_market::{money::format_inr, Cart, CartItem, Wallet};
use base64::{engine::general_purpose::STANDARD, Engine as _};
use serde::Serialize;

/// Health report for the configured provider and localization.
pub async fn status(
    cfg: &config::Config,
    provider: &Arc<dyn Provider>,
    localizer: &Localizer,
) -> String {
    let available = provider.is_available().await;
    let mut out = String::new();
    out.push_str(&format!("{}\n", cfg.annadata.name));
    out.push_str(&format!(
        "  provider: {} ({})\n",
        provider.name(),
        if available { "available" } else { "unavailable" }
    ));
    out.push_str(&format!(
        "  advisory cache: {}\n",
        if cfg.advisory.cache_enabled {
            format!("on, ttl {}s", cfg.advisory.cache_ttl_secs)
        } else {
            "off".to_string()
        }
    ));
    out.push_str(&format!(
        "  language: {} (catalog: {}, default: {})",
        localizer.language(),
        localizer.loaded_language(),
        localizer.default_language()
    ));
    out
}

/// Run one advisory variant and render its result as JSON.
///
/// `strict` surfaces upstream errors instead of the fallback payload.
pub async fn advise<A: Advisory>(
    advisor: &Advisor,
    input: A::Input,
    strict: bool,
) -> anyhow::Result<String> {
    if strict {
        let output = advisor.try_advise::<A>(&input).await?;
        return Ok(serde_json::to_string_pretty(&output)?);
    }
    let advice = advisor.advise::<A>(&input).await?;
    render(&advice)
}

fn render<T: Serialize>(advice: &Advice<T>) -> anyhow::Result<String> {
    Ok(serde_json::to_string_pretty(advice)?)
}

/// Build a voice search input from a recorded clip or a ready data URI.
pub fn voice_input(
    audio: Option<&Path>,
    mime: &str,
    data_uri: Option<String>,
) -> anyhow::Result<VoiceSearchInput> {
    let audio_data_uri = match (audio, data_uri) {
        (_, Some(uri)) => uri,
        (Some(path), None) => {
            let bytes = std::fs::read(path)
                .map_err(|e| anyhow::anyhow!("cannot read {}: {e}", path.display()))?;
            format!("data:{mime};base64,{}", STANDARD.encode(bytes))
        }
        (None, None) => anyhow::bail!("pass an audio file or --data-uri"),
    };
    Ok(VoiceSearchInput { audio_data_uri })
}

/// Parse `name=value` pairs for placeholder substitution.
pub fn parse_args(pairs: &[String]) -> anyhow::Result<Vec<(String, String)>> {
    pairs
        .iter()
        .map(|pair| match pair.split_once('=') {
            Some((name, value)) if !name.trim().is_empty() => {
                Ok((name.trim().to_string(), value.to_string()))
            }
            _ => anyhow::bail!("expected name=value, got '{pair}'"),
        })
        .collect()
}

/// Look up `key` in the active catalog.
pub fn translate(localizer: &Localizer, key: &str, args: &[(String, String)]) -> String {
    let args: Vec<(&str, &dyn std::fmt::Display)> = args
        .iter()
        .map(|(k, v)| (k.as_str(), v as &dyn std::fmt::Display))
        .collect();
    localizer.t_with(key, &args)
}

/// Show or switch the active language.
pub async fn language(localizer: &Localizer, code: Option<&str>) -> anyhow::Result<String> {
    let Some(code) = code else {
        let mut out = format!(
            "{}: {} ({})\n",
            localizer.t("language.label"),
            localizer.language().native_name(),
            localizer.language().code()
        );
        for lang in Language::ALL {
            out.push_str(&format!(
                "  {:<3} {} / {}\n",
                lang.code(),
                lang.english_name(),
                lang.native_name()
            ));
        }
        return Ok(out.trim_end().to_string());
    };

    let switch = localizer.set_language(code).await?;
    let mut out = format!(
        "{}: {}",
        localizer.t("language.label"),
        switch.requested.native_name()
    );
    if switch.loaded != switch.requested {
        out.push_str(&format!(
            " (translations unavailable, showing {})",
            switch.loaded.english_name()
        ));
    }
    Ok(out)
}

/// Return to the default language and clear the saved choice.
pub async fn reset_language(localizer: &Localizer) -> anyhow::Result<String> {
    let switch = localizer.reset_language().await?;
    Ok(format!(
        "{}: {}",
        localizer.t("language.label"),
        switch.requested.native_name()
    ))
}

/// Parse `product:price_paise[:quantity]`.
pub fn parse_item(spec: &str) -> anyhow::Result<CartItem> {
    let mut parts = spec.split(':');
    let product = parts.next().unwrap_or_default().trim();
    if product.is_empty() {
        anyhow::bail!("item '{spec}' has no product name");
    }
    let unit_price: u64 = parts
        .next()
        .ok_or_else(|| anyhow::anyhow!("item '{spec}' has no price"))?
        .trim()
        .parse()
        .map_err(|e| anyhow::anyhow!("item '{spec}' has a bad price: {e}"))?;
    let quantity: u32 = match parts.next() {
        Some(q) => q
            .trim()
            .parse()
            .map_err(|e| anyhow::anyhow!("item '{spec}' has a bad quantity: {e}"))?,
        None => 1,
    };
    if parts.next().is_some() {
        anyhow::bail!("item '{spec}' has too many fields");
    }
    Ok(CartItem {
        product_id: product.to_lowercase(),
        name: product.to_string(),
        unit_price,
        quantity,
    })
}

/// Fill a cart, pay from a wallet topped up with `balance`, and report in
/// the active language.
pub fn checkout(localizer: &Localizer, items: &[String], balance: u64) -> anyhow::Result<String> {
    let mut cart = Cart::new();
    for spec in items {
        cart.add(parse_item(spec)?)?;
    }
    if cart.is_empty() {
        return Ok(localizer.t("cart.empty"));
    }

    let mut wallet = Wallet::new();
    if balance > 0 {
        wallet.credit(balance, "top-up")?;
    }

    let total = cart.total()?;
    let mut lines = vec![
        localizer.t_with("cart.itemCount", &[("count", &cart.item_count())]),
        localizer.t_with("cart.total", &[("amount", &format_inr(total))]),
    ];
    match wallet.pay_for(&mut cart) {
        Ok(paid) => {
            tracing::debug!("checkout paid {paid} paise");
            lines.push(localizer.t("cart.checkout"));
        }
        Err(e) => {
            tracing::debug!("checkout declined: {e}");
            lines.push(localizer.t("wallet.insufficient"));
        }
    }
    lines.push(localizer.t_with(
        "wallet.balance",
        &[("amount", &format_inr(wallet.balance()))],
    ));
    Ok(lines.join("\n"))
}
