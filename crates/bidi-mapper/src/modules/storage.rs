//! `storage` module handlers (spec §2 "input/storage/other").
//!
//! Cookie access is mediated through CDP's `Storage` domain, scoped by
//! browser context so reads/writes stay within the right user context.

use std::sync::Arc;

use bidi_cdp::protocol::storage as cdp_storage;
use bidi_types::network::{BytesValue, SameSite};
use bidi_types::storage::{
    CookieFilter, DeleteCookiesParams, GetCookiesParams, GetCookiesResult, PartitionDescriptor,
    SetCookieParams, SetCookieResult,
};
use serde_json::Value;

use crate::engine::MapperEngine;
use crate::error::MapperError;
use crate::stores::user_context::DEFAULT_USER_CONTEXT;

use super::ok;

fn browser_context_for(
    engine: &Arc<MapperEngine>,
    partition: &Option<PartitionDescriptor>,
) -> Result<Option<String>, MapperError> {
    let user_context = match partition {
        Some(PartitionDescriptor {
            user_context: Some(user_context),
            ..
        }) => user_context.clone(),
        Some(PartitionDescriptor {
            context: Some(context),
            ..
        }) => engine.contexts.read().get(context)?.user_context.clone(),
        _ => DEFAULT_USER_CONTEXT.to_string(),
    };

    if !engine.user_contexts.read().exists(&user_context) {
        return Err(MapperError::no_such_user_context(&user_context));
    }
    Ok(engine.cdp_browser_context(&user_context))
}

fn same_site_to_bidi(value: Option<&str>) -> SameSite {
    match value {
        Some("Strict") => SameSite::Strict,
        Some("None") => SameSite::None,
        _ => SameSite::Lax,
    }
}

fn same_site_to_cdp(value: SameSite) -> cdp_storage::CookieSameSite {
    match value {
        SameSite::Strict => cdp_storage::CookieSameSite::Strict,
        SameSite::Lax => cdp_storage::CookieSameSite::Lax,
        SameSite::None => cdp_storage::CookieSameSite::None,
    }
}

fn cookie_matches(cookie: &cdp_storage::Cookie, filter: &CookieFilter) -> bool {
    filter.name.as_deref().is_none_or(|n| n == cookie.name)
        && filter.domain.as_deref().is_none_or(|d| d == cookie.domain)
        && filter.path.as_deref().is_none_or(|p| p == cookie.path)
}

fn cdp_cookie_to_bidi(cookie: cdp_storage::Cookie) -> bidi_types::network::Cookie {
    bidi_types::network::Cookie {
        name: cookie.name,
        value: BytesValue::String { value: cookie.value },
        domain: cookie.domain,
        path: cookie.path,
        size: cookie.size.unwrap_or(0),
        http_only: cookie.http_only,
        secure: cookie.secure,
        same_site: same_site_to_bidi(cookie.same_site.as_deref()),
        expiry: (cookie.expires >= 0.0).then_some(cookie.expires as i64),
    }
}

pub async fn get_cookies(
    engine: &Arc<MapperEngine>,
    params: GetCookiesParams,
) -> Result<Value, MapperError> {
    let browser_context_id = browser_context_for(engine, &params.partition)?;

    let result: cdp_storage::GetCookiesResult = engine
        .cdp
        .send_command(
            "Storage.getCookies",
            Some(cdp_storage::GetCookiesParams {
                browser_context_id,
            }),
            None,
        )
        .await?;

    let filter = params.filter.unwrap_or_default();
    let cookies = result
        .cookies
        .into_iter()
        .filter(|c| cookie_matches(c, &filter))
        .map(cdp_cookie_to_bidi)
        .collect();

    ok(GetCookiesResult {
        cookies,
        partition_key: serde_json::json!({}),
    })
}

pub async fn set_cookie(
    engine: &Arc<MapperEngine>,
    params: SetCookieParams,
) -> Result<Value, MapperError> {
    let browser_context_id = browser_context_for(engine, &params.partition)?;

    let cookie = params.cookie;
    let _: Value = engine
        .cdp
        .send_command(
            "Storage.setCookies",
            Some(cdp_storage::SetCookiesParams {
                cookies: vec![cdp_storage::CookieParam {
                    name: cookie.name,
                    value: cookie.value.to_cdp_string(),
                    url: None,
                    domain: Some(cookie.domain),
                    path: Some(cookie.path),
                    secure: Some(cookie.secure),
                    http_only: Some(cookie.http_only),
                    same_site: Some(same_site_to_cdp(cookie.same_site)),
                    expires: cookie.expiry.map(|e| e as f64),
                    partition_key: None,
                }],
                browser_context_id,
            }),
            None,
        )
        .await?;

    ok(SetCookieResult {
        partition_key: serde_json::json!({}),
    })
}

pub async fn delete_cookies(
    engine: &Arc<MapperEngine>,
    params: DeleteCookiesParams,
) -> Result<Value, MapperError> {
    let browser_context_id = browser_context_for(engine, &params.partition)?;
    let filter = params.filter.unwrap_or_default();

    let existing: cdp_storage::GetCookiesResult = engine
        .cdp
        .send_command(
            "Storage.getCookies",
            Some(cdp_storage::GetCookiesParams {
                browser_context_id: browser_context_id.clone(),
            }),
            None,
        )
        .await?;

    for cookie in existing.cookies.into_iter().filter(|c| cookie_matches(c, &filter)) {
        let _: Value = engine
            .cdp
            .send_command(
                "Storage.deleteCookies",
                Some(cdp_storage::DeleteCookiesParams {
                    name: cookie.name,
                    url: None,
                    domain: Some(cookie.domain),
                    path: Some(cookie.path),
                    partition_key: None,
                    browser_context_id: browser_context_id.clone(),
                }),
                None,
            )
            .await?;
    }

    ok(serde_json::json!({}))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn cookie(name: &str, domain: &str) -> cdp_storage::Cookie {
        cdp_storage::Cookie {
            name: name.to_string(),
            value: "v".to_string(),
            domain: domain.to_string(),
            path: "/".to_string(),
            expires: -1.0,
            size: Some(1),
            http_only: false,
            secure: false,
            session: true,
            same_site: None,
        }
    }

    #[test]
    fn filter_matches_on_name_and_domain() {
        let filter = CookieFilter {
            name: Some("sid".into()),
            domain: None,
            path: None,
        };
        assert!(cookie_matches(&cookie("sid", "example.test"), &filter));
        assert!(!cookie_matches(&cookie("other", "example.test"), &filter));
    }

    #[test]
    fn empty_filter_matches_everything() {
        let filter = CookieFilter::default();
        assert!(cookie_matches(&cookie("sid", "example.test"), &filter));
    }
}
