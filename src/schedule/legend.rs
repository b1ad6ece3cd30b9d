use super::GroupCode;

/// Display classes for a group's cells and legend chip.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct GroupStyle {
    pub color: &'static str,
    pub text: &'static str,
}

const fn style(color: &'static str, text: &'static str) -> GroupStyle {
    GroupStyle { color, text }
}

impl GroupCode {
    pub fn style(&self) -> GroupStyle {
        match self {
            GroupCode::Ecole => style("bg-yellow-400 hover:bg-yellow-500", "text-black"),
            GroupCode::Pub => style("bg-blue-400 hover:bg-blue-500", "text-white"),
            GroupCode::Cu10 => style("bg-green-500 hover:bg-green-600", "text-white"),
            GroupCode::Cu12 => style("bg-red-600 hover:bg-red-700", "text-white"),
            GroupCode::Cu14 => style("bg-blue-600 hover:bg-blue-700", "text-white"),
            GroupCode::Cu16 => style("bg-cyan-500 hover:bg-cyan-600", "text-white"),
            GroupCode::Cu18 => style("bg-gray-800 hover:bg-gray-900", "text-white"),
            GroupCode::A1 => style("bg-pink-500 hover:bg-pink-600", "text-white"),
            GroupCode::A2 => style("bg-purple-500 hover:bg-purple-600", "text-white"),
            GroupCode::A3 => style("bg-purple-700 hover:bg-purple-800", "text-white"),
            GroupCode::A4 => style("bg-purple-400 hover:bg-purple-500", "text-white"),
            GroupCode::A5 => style("bg-purple-300 hover:bg-purple-400", "text-black"),
            GroupCode::I1 => style("bg-red-500 hover:bg-red-600", "text-white"),
            GroupCode::Y1 => style("bg-amber-700 hover:bg-amber-800", "text-white"),
            GroupCode::L1 => style("bg-yellow-300 hover:bg-yellow-400", "text-black"),
            GroupCode::Pubet => style("bg-blue-300 hover:bg-blue-400", "text-black"),
            GroupCode::Et => style("bg-blue-200 hover:bg-blue-300", "text-black"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn every_group_has_a_background() {
        for group in GroupCode::ALL {
            let style = group.style();
            assert!(style.color.starts_with("bg-"), "{group}");
            assert!(style.text.starts_with("text-"), "{group}");
        }
    }
}
