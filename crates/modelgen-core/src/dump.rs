use std::fmt::Write;

use crate::model::{DataTypeKind, Project};

fn tab(n: usize) -> String {
    " ".repeat(n)
}

/// Human-readable tree of a loaded project, for verbose output.
pub fn dump_project(project: &Project) -> String {
    let mut out = String::new();
    // writing into a String cannot fail
    let _ = write_project(&mut out, project);
    out
}

fn write_project(out: &mut String, project: &Project) -> std::fmt::Result {
    writeln!(out, "Project <{}> :", project.name)?;

    writeln!(out, "\nAttributes : x{}", project.attributes.len())?;
    for (name, value) in project.attributes.iter() {
        writeln!(out, "{}- Attribute <{name}> = <{value}>", tab(6))?;
    }

    let user_types: Vec<_> = project.user_data_types().collect();
    writeln!(out, "\nData types : x{}", user_types.len())?;
    for data_type in user_types {
        writeln!(out, "{}- Data type {} <{}>", tab(6), data_type.kind, data_type.name)?;
        if data_type.kind == DataTypeKind::Enumeration {
            for value in &data_type.values {
                writeln!(out, "{}- <{value}>", tab(10))?;
            }
        }
    }

    writeln!(out, "\nObjects : x{}", project.objects.len())?;
    for object in &project.objects {
        writeln!(out, "\n{}- Object <{}> :", tab(2), object.name)?;

        writeln!(out, "{}  Attributes : x{}", tab(2), object.attributes.len())?;
        for (name, value) in object.attributes.iter() {
            writeln!(out, "{}- Attribute <{name}> = <{value}>", tab(6))?;
        }

        writeln!(out, "{}  Properties : x{}", tab(2), object.properties.len())?;
        for property in &object.properties {
            writeln!(
                out,
                "{}- Property <{}> (type:{}, mandatory:{})",
                tab(6),
                property.name,
                project.data_type(property.data_type).name,
                property.mandatory
            )?;
        }

        writeln!(out, "{}  Links : x{}", tab(2), object.links.len())?;
        for link in &object.links {
            writeln!(
                out,
                "{}- Link <{}> (target:{}, mandatory:{})",
                tab(6),
                link.name,
                project.object(link.target).name,
                link.mandatory
            )?;
        }

        writeln!(out, "{}  Reverse links : x{}", tab(2), object.reverse_links.len())?;
        for id in &object.reverse_links {
            let link = project.link(*id);
            writeln!(
                out,
                "{}- Link <{}> (source:{})",
                tab(6),
                link.name,
                project.object(link.source).name
            )?;
        }

        writeln!(out, "{}  Indexes : x{}", tab(2), object.indexes.len())?;
        for index in &object.indexes {
            writeln!(out, "{}- Index <{}> (unique:{}) :", tab(6), index.name, index.unique)?;
            let count = index.keys.len();
            for key in &index.keys {
                writeln!(
                    out,
                    "{}- Key n°{}/{count} : {} <{}>",
                    tab(8),
                    key.position,
                    key.kind(),
                    project.key_reference_name(key)
                )?;
            }
        }
    }

    writeln!(out, "\nFiles : x{}", project.files.len())?;
    for (idx, file) in project.files.iter().enumerate() {
        writeln!(out, "{}- File n°{} (scope <{}>)", tab(2), idx + 1, file.scope)?;
        writeln!(out, "{}   - Input : <{}>", tab(2), file.input)?;
        writeln!(out, "{}   - Output : <{}>", tab(2), file.output)?;
    }
    Ok(())
}
