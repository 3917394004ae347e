fn main() -> anyhow::Result<()> {
    esm_endian::cli::run_cli()
}
