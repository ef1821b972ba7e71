//
//  bitbucket-ops
//  cli/operations.rs
//
//  Created by Ngonidzashe Mangudya on 2026/01/12.
//  Copyright (c) 2025 IAMNGONI. All rights reserved.
//

//! `bbops operations`: the operation catalogue.

use anyhow::Result;
use clap::Args;
use serde_json::json;

use crate::operations::OperationKind;
use crate::output::{print_header, write_json, TableBuilder};

use super::GlobalOptions;

#[derive(Args, Debug)]
pub struct OperationsCommand {
    /// Show the parameters of one operation only
    pub operation: Option<String>,
}

impl OperationsCommand {
    pub fn run(&self, global: &GlobalOptions) -> Result<()> {
        let kinds: Vec<OperationKind> = match &self.operation {
            Some(name) => {
                let kind = OperationKind::ALL
                    .into_iter()
                    .find(|k| k.name() == name.replace('-', "_"))
                    .ok_or_else(|| anyhow::anyhow!("Unknown operation '{}'", name))?;
                vec![kind]
            }
            None => OperationKind::ALL.to_vec(),
        };

        if global.json {
            let catalogue: Vec<_> = kinds
                .iter()
                .map(|kind| {
                    json!({
                        "operation": kind,
                        "description": kind.description(),
                        "parameters": kind.parameters().iter().map(|p| json!({
                            "name": p.name,
                            "required": p.required,
                            "description": p.description,
                        })).collect::<Vec<_>>(),
                    })
                })
                .collect();
            return write_json(&catalogue);
        }

        for kind in kinds {
            print_header(&format!("{}: {}", kind, kind.description()));
            let mut table = TableBuilder::new().headers(vec!["Parameter", "Required", "Description"]);
            for param in kind.parameters() {
                table = table.row(vec![
                    param.name,
                    if param.required { "yes" } else { "no" },
                    param.description,
                ]);
            }
            table.print();
            println!();
        }
        Ok(())
    }
}
