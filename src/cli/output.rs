//! `kiln output`: print a page's output file and URL.

use anyhow::Result;
use kiln::config::SiteConfig;
use kiln::render::{OutputPathResolver, PageRef};

use super::OutputArgs;

pub fn show_output(args: &OutputArgs, config: &SiteConfig) -> Result<()> {
    let page = page(args);
    let resolver = OutputPathResolver::new(config);
    println!("{}", resolver.output_file(&page, &args.format)?);
    println!("/{}", resolver.url(&page, &args.format)?);
    Ok(())
}

fn page(args: &OutputArgs) -> PageRef {
    let page = PageRef::new(args.path.trim_matches('/')).with_ugly_url(args.ugly);
    match &args.lang {
        Some(lang) => page.with_language(lang.clone()),
        None => page,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_page_from_args() {
        let args = OutputArgs {
            path: "/blog/post/".into(),
            format: "html".into(),
            lang: Some("fr".into()),
            ugly: false,
        };
        let page = page(&args);
        assert_eq!(page.path, "blog/post");
        assert_eq!(page.language.as_deref(), Some("fr"));
    }

    #[test]
    fn test_unknown_format_fails() {
        let args = OutputArgs {
            path: "a".into(),
            format: "nope".into(),
            lang: None,
            ugly: false,
        };
        assert!(show_output(&args, &SiteConfig::default()).is_err());
    }
}
