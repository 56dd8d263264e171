//! `examiner status` — Show providers and knowledge store status.

use examiner_config::AppConfig;

pub fn run(config: &AppConfig) -> Result<(), Box<dyn std::error::Error>> {
    let providers = &config.providers;
    let configured = |yes: bool| if yes { "configured" } else { "no API key" };

    println!("📜 History Examiner Status");
    println!("==========================");
    println!("  Config dir:   {}", AppConfig::config_dir().display());
    println!(
        "  Primary:      {} ({}, {})",
        providers.primary.model,
        providers.primary.api_url,
        configured(providers.primary_configured())
    );
    println!(
        "  Secondary:    {} ({}, {})",
        providers.secondary.model,
        providers.secondary.api_url,
        configured(providers.secondary_configured())
    );
    println!("  Gateway:      {}:{}", config.gateway.host, config.gateway.port);
    println!("  Knowledge:    {}", config.knowledge.path.display());

    if config.knowledge.path.exists() {
        let stats = examiner_context::store::load(&config.knowledge.path)?.stats();
        println!("    Topics:             {}", stats.topics);
        println!("    Syllabus items:     {}", stats.syllabus_items);
        println!("    Past-paper entries: {}", stats.past_paper_entries);
    } else {
        println!("\n  ⚠️  Knowledge file not found; answers will carry no context");
    }

    if !providers.primary_configured() && !providers.secondary_configured() {
        println!("\n  ⚠️  No generation provider configured. Set GROQ_API_KEY or HF_API_KEY.");
    }

    Ok(())
}
