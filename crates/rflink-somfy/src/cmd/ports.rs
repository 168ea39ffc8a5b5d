use crate::exit::{transport_error, CliResult, SUCCESS};
use crate::output::{print_ports, OutputFormat};

pub fn run(format: OutputFormat) -> CliResult<i32> {
    let ports =
        rflink_transport::list_ports().map_err(|err| transport_error("port scan failed", err))?;
    print_ports(&ports, format);
    Ok(SUCCESS)
}
