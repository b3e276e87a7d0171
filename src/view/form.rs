use std::fmt;

use crate::{
    domain::CategoryForm,
    view::terminal::{status_badge, Colorize},
};

/// Renders the current state of a form's draft.
#[derive(Debug, Clone, Copy)]
pub struct FormView<'a>(pub &'a CategoryForm);

impl fmt::Display for FormView<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let form = self.0;
        let draft = form.draft();
        let meta = &draft.metadata_config;

        writeln!(f, "{}", form.legend().heading())?;
        let name = if draft.name.trim().is_empty() {
            "(required)".warning()
        } else {
            draft.name.clone()
        };
        writeln!(f, "  Name *        {name}")?;
        writeln!(f, "  Description   {}", draft.description)?;
        writeln!(f, "  Status *      {}", status_badge(draft.status))?;
        writeln!(f, "  Precision *   {}", draft.precision_type)?;
        writeln!(f, "  Group *       {}", draft.group)?;

        writeln!(f, "{}", "Metadata".dim())?;
        let case = if meta.case_sensitive { "Yes" } else { "No" };
        writeln!(f, "  Case sensitive   {case}")?;
        match meta.match_threshold {
            Some(threshold) => writeln!(f, "  Match threshold  {threshold}")?,
            None => writeln!(f, "  Match threshold  {}", "unset".dim())?,
        }
        for (index, rule) in meta.rules.iter().enumerate() {
            writeln!(f, "  {}. {rule}", index + 1)?;
        }

        writeln!(f, "{}", "Sub-categories".dim())?;
        for sub in &draft.sub_categories {
            writeln!(f, "  • {}", sub.name)?;
        }

        if form.is_valid() {
            write!(f, "[{}]", form.submit_label())
        } else {
            write!(f, "{}", format!("[{}] (name required)", form.submit_label()).dim())
        }
    }
}
