use super::{build_fs, load_language, Context};

pub fn execute(ctx: &Context, strings: &[String]) -> anyhow::Result<()> {
    let mut fs = build_fs(ctx)?;
    let resolver = load_language(&mut fs, &ctx.language)?;

    for template in strings {
        let resolved = resolver.resolve(template, None)?;
        println!("{}", resolved.text);
    }

    Ok(())
}
