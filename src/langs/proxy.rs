//! Outbound proxy settings forwarded into build stages

use reqwest::Url;
use std::env;

/// Ambient `http_proxy` / `https_proxy` / `no_proxy` values
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ProxySettings {
    pub http: Option<String>,
    pub https: Option<String>,
    pub no_proxy: Option<String>,
}

impl ProxySettings {
    pub fn from_env() -> Self {
        Self {
            http: non_empty_var("http_proxy"),
            https: non_empty_var("https_proxy"),
            no_proxy: non_empty_var("no_proxy"),
        }
    }

    /// JVM system properties understood by Maven and the JDK networking stack.
    ///
    /// Proxies that do not parse to a host are skipped. `no_proxy` hosts are
    /// converted from comma-separated to the pipe-separated form of
    /// `http.nonProxyHosts`.
    pub fn jvm_properties(&self) -> Vec<String> {
        let mut props = Vec::new();

        if let Some((host, port)) = self.http.as_deref().and_then(host_and_port) {
            props.push(format!("-Dhttp.proxyHost={}", host));
            props.push(format!("-Dhttp.proxyPort={}", port));
        }

        if let Some((host, port)) = self.https.as_deref().and_then(host_and_port) {
            props.push(format!("-Dhttps.proxyHost={}", host));
            props.push(format!("-Dhttps.proxyPort={}", port));
        }

        if let Some(hosts) = self.no_proxy.as_deref() {
            let hosts: Vec<&str> = hosts
                .split(',')
                .map(str::trim)
                .filter(|h| !h.is_empty())
                .collect();
            if !hosts.is_empty() {
                props.push(format!("-Dhttp.nonProxyHosts={}", hosts.join("|")));
            }
        }

        props
    }
}

fn non_empty_var(name: &str) -> Option<String> {
    env::var(name).ok().filter(|v| !v.trim().is_empty())
}

fn host_and_port(raw: &str) -> Option<(String, u16)> {
    let raw = raw.trim();
    let url = if raw.contains("://") {
        Url::parse(raw)
    } else {
        Url::parse(&format!("http://{}", raw))
    }
    .ok()?;

    let host = url.host_str()?.to_string();
    let port = url.port_or_known_default()?;
    Some((host, port))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_no_proxy_settings() {
        assert!(ProxySettings::default().jvm_properties().is_empty());
    }

    #[test]
    fn test_http_and_https_proxy() {
        let proxy = ProxySettings {
            http: Some("http://proxy.corp:3128".to_string()),
            https: Some("http://secure.corp:8443/".to_string()),
            no_proxy: None,
        };
        assert_eq!(
            proxy.jvm_properties(),
            vec![
                "-Dhttp.proxyHost=proxy.corp",
                "-Dhttp.proxyPort=3128",
                "-Dhttps.proxyHost=secure.corp",
                "-Dhttps.proxyPort=8443",
            ]
        );
    }

    #[test]
    fn test_proxy_without_scheme_or_port() {
        let proxy = ProxySettings {
            http: Some("proxy.corp".to_string()),
            ..Default::default()
        };
        assert_eq!(
            proxy.jvm_properties(),
            vec!["-Dhttp.proxyHost=proxy.corp", "-Dhttp.proxyPort=80"]
        );
    }

    #[test]
    fn test_no_proxy_becomes_pipe_separated() {
        let proxy = ProxySettings {
            no_proxy: Some("localhost,127.0.0.1, .corp".to_string()),
            ..Default::default()
        };
        assert_eq!(
            proxy.jvm_properties(),
            vec!["-Dhttp.nonProxyHosts=localhost|127.0.0.1|.corp"]
        );
    }

    #[test]
    fn test_unparsable_proxy_is_skipped() {
        let proxy = ProxySettings {
            http: Some("http://".to_string()),
            ..Default::default()
        };
        assert!(proxy.jvm_properties().is_empty());
    }
}
