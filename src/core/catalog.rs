//! Backend catalog
//!
//! An ordered, static table of backend descriptors. Pure data: behavior
//! lives in the classifier and resolver functions that switch on descriptor
//! fields. Catalog order is the classifier's scan order — gateways first,
//! then local deployments, then standard vendors.

/// How a gateway or local deployment is recognized from configured
/// credentials.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Detection {
    /// The configured API key starts with this literal prefix.
    KeyPrefix(&'static str),
    /// The configured base URL contains this substring.
    BaseUrlContains(&'static str),
}

/// Structural category of a backend. Exactly one variant applies per entry.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BackendKind {
    /// Direct vendor API, matched by model-name keyword.
    Standard,
    /// Forwards arbitrary underlying models on behalf of other vendors.
    Gateway {
        detection: Detection,
        /// Remove a vendor prefix already present on the caller's model
        /// string before applying the gateway's own prefix.
        strip_existing_prefix: bool,
    },
    /// Self-hosted deployment rather than a remote vendor API.
    Local { detection: Detection },
}

/// A parameter value forced by a [`ModelOverride`].
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum OverrideValue {
    Float(f64),
    Int(u64),
}

/// Parameters forced for models whose resolved name contains a substring,
/// regardless of what the caller supplied.
#[derive(Debug, Clone, Copy)]
pub struct ModelOverride {
    pub model_substring: &'static str,
    pub params: &'static [(&'static str, OverrideValue)],
}

/// One configured provider: credentials shape, routing keywords, prefixing
/// rules, and parameter overrides. Defined once at process start, never
/// mutated.
#[derive(Debug, Clone, Copy)]
pub struct BackendDescriptor {
    /// Unique identifier, matching the configuration key for this backend.
    pub name: &'static str,
    /// Model-name substrings routed here (standard backends only).
    pub keywords: &'static [&'static str],
    /// Environment variable the transport ecosystem reads for the API key.
    pub credential_env_key: &'static str,
    /// Environment variable for a base-URL override, where one is
    /// conventional for this backend.
    pub base_url_env_key: Option<&'static str>,
    /// Prefix prepended on resolution ("" if none).
    pub model_prefix: &'static str,
    pub kind: BackendKind,
    /// Wire endpoint used when the configuration supplies no base URL.
    pub default_base_url: &'static str,
    pub overrides: &'static [ModelOverride],
}

impl BackendDescriptor {
    pub const fn is_gateway(&self) -> bool {
        matches!(self.kind, BackendKind::Gateway { .. })
    }

    pub const fn is_local(&self) -> bool {
        matches!(self.kind, BackendKind::Local { .. })
    }

    pub const fn is_standard(&self) -> bool {
        matches!(self.kind, BackendKind::Standard)
    }

    /// Detection rule for gateway and local entries.
    pub const fn detection(&self) -> Option<Detection> {
        match self.kind {
            BackendKind::Gateway { detection, .. } | BackendKind::Local { detection } => {
                Some(detection)
            }
            BackendKind::Standard => None,
        }
    }
}

/// Moonshot's kimi-k2.5 family rejects sampling temperatures other than 1.0.
const KIMI_K25_OVERRIDE: ModelOverride = ModelOverride {
    model_substring: "kimi-k2.5",
    params: &[("temperature", OverrideValue::Float(1.0))],
};

/// The full backend table, in classifier scan order.
pub const CATALOG: &[BackendDescriptor] = &[
    // Gateways
    BackendDescriptor {
        name: "openrouter",
        keywords: &[],
        credential_env_key: "OPENROUTER_API_KEY",
        base_url_env_key: Some("OPENROUTER_API_BASE"),
        model_prefix: "openrouter",
        kind: BackendKind::Gateway {
            detection: Detection::KeyPrefix("sk-or-"),
            strip_existing_prefix: true,
        },
        default_base_url: "https://openrouter.ai/api/v1",
        overrides: &[],
    },
    BackendDescriptor {
        name: "aihubmix",
        keywords: &[],
        credential_env_key: "AIHUBMIX_API_KEY",
        base_url_env_key: Some("AIHUBMIX_API_BASE"),
        // The hub speaks the OpenAI wire format, so resolved names carry the
        // openai prefix.
        model_prefix: "openai",
        kind: BackendKind::Gateway {
            detection: Detection::BaseUrlContains("aihubmix"),
            strip_existing_prefix: true,
        },
        default_base_url: "https://aihubmix.com/v1",
        overrides: &[],
    },
    // Local deployments
    BackendDescriptor {
        name: "vllm",
        keywords: &[],
        credential_env_key: "HOSTED_VLLM_API_KEY",
        base_url_env_key: Some("HOSTED_VLLM_API_BASE"),
        model_prefix: "hosted_vllm",
        kind: BackendKind::Local {
            detection: Detection::BaseUrlContains("localhost:8000"),
        },
        default_base_url: "http://localhost:8000/v1",
        overrides: &[],
    },
    BackendDescriptor {
        name: "lmstudio",
        keywords: &[],
        credential_env_key: "LM_STUDIO_API_KEY",
        base_url_env_key: Some("LM_STUDIO_API_BASE"),
        model_prefix: "lm_studio",
        kind: BackendKind::Local {
            detection: Detection::BaseUrlContains("localhost:1234"),
        },
        default_base_url: "http://localhost:1234/v1",
        overrides: &[],
    },
    // Standard vendors
    BackendDescriptor {
        name: "anthropic",
        keywords: &["claude"],
        credential_env_key: "ANTHROPIC_API_KEY",
        base_url_env_key: None,
        model_prefix: "anthropic",
        kind: BackendKind::Standard,
        default_base_url: "https://api.anthropic.com/v1",
        overrides: &[],
    },
    BackendDescriptor {
        name: "openai",
        keywords: &["gpt", "o1", "o3", "o4"],
        credential_env_key: "OPENAI_API_KEY",
        base_url_env_key: None,
        model_prefix: "openai",
        kind: BackendKind::Standard,
        default_base_url: "https://api.openai.com/v1",
        overrides: &[],
    },
    BackendDescriptor {
        name: "deepseek",
        keywords: &["deepseek"],
        credential_env_key: "DEEPSEEK_API_KEY",
        base_url_env_key: None,
        model_prefix: "deepseek",
        kind: BackendKind::Standard,
        default_base_url: "https://api.deepseek.com/v1",
        overrides: &[],
    },
    BackendDescriptor {
        name: "gemini",
        keywords: &["gemini"],
        credential_env_key: "GEMINI_API_KEY",
        base_url_env_key: None,
        model_prefix: "gemini",
        kind: BackendKind::Standard,
        default_base_url: "https://generativelanguage.googleapis.com/v1beta/openai",
        overrides: &[],
    },
    BackendDescriptor {
        name: "groq",
        keywords: &["groq"],
        credential_env_key: "GROQ_API_KEY",
        base_url_env_key: None,
        model_prefix: "groq",
        kind: BackendKind::Standard,
        default_base_url: "https://api.groq.com/openai/v1",
        overrides: &[],
    },
    BackendDescriptor {
        name: "moonshot",
        keywords: &["kimi", "moonshot"],
        credential_env_key: "MOONSHOT_API_KEY",
        base_url_env_key: None,
        model_prefix: "moonshot",
        kind: BackendKind::Standard,
        default_base_url: "https://api.moonshot.ai/v1",
        overrides: &[KIMI_K25_OVERRIDE],
    },
    BackendDescriptor {
        name: "dashscope",
        keywords: &["qwen"],
        credential_env_key: "DASHSCOPE_API_KEY",
        base_url_env_key: None,
        model_prefix: "dashscope",
        kind: BackendKind::Standard,
        default_base_url: "https://dashscope.aliyuncs.com/compatible-mode/v1",
        overrides: &[],
    },
    BackendDescriptor {
        name: "zai",
        keywords: &["glm"],
        credential_env_key: "ZAI_API_KEY",
        base_url_env_key: None,
        model_prefix: "zai",
        kind: BackendKind::Standard,
        default_base_url: "https://api.z.ai/api/paas/v4",
        overrides: &[],
    },
    BackendDescriptor {
        name: "mistral",
        keywords: &["mistral", "mixtral"],
        credential_env_key: "MISTRAL_API_KEY",
        base_url_env_key: None,
        model_prefix: "mistral",
        kind: BackendKind::Standard,
        default_base_url: "https://api.mistral.ai/v1",
        overrides: &[],
    },
];

/// The full ordered table.
pub fn catalog() -> &'static [BackendDescriptor] {
    CATALOG
}

/// Look up a descriptor by its unique name.
pub fn lookup_by_name(name: &str) -> Option<&'static BackendDescriptor> {
    CATALOG.iter().find(|backend| backend.name == name)
}
