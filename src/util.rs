pub fn format_price(price: f64, decimals: usize) -> String {
    format!("R$ {price:.decimals$}")
}

pub fn format_change(change_percent: f64) -> String {
    let arrow = if change_percent >= 0.0 { '▲' } else { '▼' };
    format!("{arrow} {:.2}%", change_percent.abs())
}

/// Host part of a URL, or the input unchanged when it does not look like one.
pub fn safe_hostname(url: &str) -> &str {
    let Some((scheme, rest)) = url.split_once("://") else {
        return url;
    };

    let valid_scheme = !scheme.is_empty()
        && scheme
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || matches!(c, '+' | '-' | '.'));
    if !valid_scheme {
        return url;
    }

    let authority = rest.split(['/', '?', '#']).next().unwrap_or(rest);
    let host_port = authority
        .rsplit_once('@')
        .map_or(authority, |(_, host)| host);
    let host = host_port.split(':').next().unwrap_or(host_port);

    if host.is_empty() { url } else { host }
}
