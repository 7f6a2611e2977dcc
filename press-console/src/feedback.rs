//! Local feedback shown while a chat message is in flight

use once_cell::sync::Lazy;
use regex::Regex;

static USERNAME_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"@([a-zA-Z0-9._]+)").unwrap());
static URL_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"https?://[^\s]+").unwrap());

/// First `@handle` in a message, with its `@`, or `"user"`
pub fn extract_username(message: &str) -> String {
    USERNAME_RE
        .captures(message)
        .map(|caps| format!("@{}", &caps[1]))
        .unwrap_or_else(|| "user".to_string())
}

/// Every http(s) URL in a message
pub fn extract_urls(message: &str) -> Vec<String> {
    URL_RE
        .find_iter(message)
        .map(|m| m.as_str().to_string())
        .collect()
}

/// System line shown as soon as a chat message is sent
///
/// Matching is ordered; the first rule that applies wins.
pub fn immediate_feedback(message: &str) -> String {
    let lower = message.to_lowercase();

    if lower.contains("scrape instagram") || lower.contains("instagram scrape") {
        if lower.contains('@') {
            return format!("🔍 Starting Instagram scrape for {}...", extract_username(message));
        }
        return "🔍 Starting Instagram scrape...".to_string();
    }

    if lower.contains("bulk import") || lower.contains("import bulk") {
        if lower.contains('@') {
            return format!("📥 Starting bulk import for {}...", extract_username(message));
        }
        return "📥 Starting bulk import...".to_string();
    }

    if lower.contains("import instagram") && (lower.contains("http") || lower.contains("instagram.com")) {
        let count = extract_urls(message).len();
        let plural = if count == 1 { "" } else { "s" };
        return format!("📱 Importing {} Instagram post{}...", count, plural);
    }

    if lower.contains("create post") || lower.contains("new post") {
        return "📝 Creating new WordPress post...".to_string();
    }

    // "status" alone is enough; it shadows the health rules below
    if lower.contains("status") {
        return "🔍 Checking Apify integration status...".to_string();
    }

    if lower.contains("cache stats") {
        return "📊 Getting cache statistics...".to_string();
    }

    if lower.contains("clear cache") {
        return "🧹 Clearing cache...".to_string();
    }

    if lower.contains("help") || lower == "?" {
        return "❓ Loading help information...".to_string();
    }

    if lower.contains("site health") || lower.contains("health check") {
        return "🏥 Running WordPress site health check...".to_string();
    }

    if lower.contains("list posts") || lower.contains("show posts") {
        return "📋 Loading WordPress posts...".to_string();
    }

    if lower.contains("list drafts") || lower.contains("show drafts") {
        return "📝 Loading draft posts...".to_string();
    }

    "🤖 Processing your request...".to_string()
}

/// Message for the typing spinner while the reply is pending
pub fn typing_message(message: &str) -> &'static str {
    let lower = message.to_lowercase();

    if lower.contains("scrape instagram") || lower.contains("bulk import") {
        "Connecting to Instagram API and processing posts..."
    } else if lower.contains("import instagram") && lower.contains("http") {
        "Extracting post data from Instagram URLs..."
    } else if lower.contains("apify status") {
        "Checking Apify API connection and usage..."
    } else if lower.contains("cache") {
        "Accessing cache system..."
    } else if lower.contains("site health") {
        "Running WordPress diagnostics..."
    } else if lower.contains("create post") {
        "Creating WordPress post..."
    } else {
        "Processing your request..."
    }
}
