use task_dispatch_core::placement::SecurityGroupFilter;

pub trait SecurityGroupDirectory {
    /// Ids of every security group matching the filter, in API order.
    fn security_group_ids(&self, filter: &SecurityGroupFilter) -> Result<Vec<String>, String>;
}
